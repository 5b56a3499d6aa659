//! Tipo de erro unificado do motor da cesta com formatação estável.
use core::fmt;
use core::fmt::Write as _;
use std::collections::BTreeMap;

use crate::basket::error_catalog::{default_locale_message, BasketErrorCode};

const CONTEXT_VALUE_MAX: usize = 256;

/// Valores de contexto ficam em uma linha e com no máximo
/// `CONTEXT_VALUE_MAX` caracteres (o último vira `…`).
fn clean_context_value(raw: &str) -> String {
    let flat = raw.chars().map(|c| if c.is_control() { ' ' } else { c });
    if raw.chars().count() <= CONTEXT_VALUE_MAX {
        return flat.collect();
    }
    flat.take(CONTEXT_VALUE_MAX - 1).chain(std::iter::once('…')).collect()
}

/// Escreve `s` como string JSON (com aspas) ao final de `out`.
fn push_json_str(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Troca `{chave}` pelo valor do contexto; chaves ausentes ficam literais.
fn fill_placeholders(template: &str, context: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('}') else {
            out.push_str(tail);
            return out;
        };
        match context.get(&tail[1..close]) {
            Some(value) => out.push_str(value),
            None => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Erro do motor com contexto estruturado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketError {
    pub code: BasketErrorCode,
    pub context: BTreeMap<String, String>,
}

impl BasketError {
    /// Cria um novo erro sem contexto adicional.
    pub fn new(code: BasketErrorCode) -> Self {
        Self {
            code,
            context: BTreeMap::new(),
        }
    }

    /// Adiciona um par chave/valor ao contexto.
    pub fn with_context<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        let key = key.into();
        if !key.is_empty() {
            self.context.insert(key, clean_context_value(&value.to_string()));
        }
        self
    }

    /// Valor de contexto já sanitizado, se presente.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    /// Ver [`BasketErrorCode::is_recoverable`].
    pub fn is_recoverable(&self) -> bool {
        self.code.is_recoverable()
    }

    /// Ativo envolvido no erro (`asset` ou `index` do contexto), se houver.
    pub fn asset_index(&self) -> Option<usize> {
        self.context_value("asset")
            .or_else(|| self.context_value("index"))
            .and_then(|v| v.parse().ok())
    }

    /// Mensagem do catálogo com o contexto aplicado.
    pub fn message(&self) -> String {
        fill_placeholders(default_locale_message(self.code), &self.context)
    }

    /// Mensagem curta para UI.
    pub fn to_user_string(&self) -> String {
        format!("[{}] {}", self.code.code(), self.message())
    }

    /// JSON estável para logs:
    /// `{"code":..,"title":..,"message":..,"context":{..}}` (contexto ordenado).
    pub fn to_log_json(&self) -> String {
        let message = self.message();
        let mut json = String::with_capacity(96 + message.len());
        json.push('{');
        for (key, value) in [
            ("code", self.code.code()),
            ("title", self.code.title()),
            ("message", message.as_str()),
        ] {
            push_json_str(&mut json, key);
            json.push(':');
            push_json_str(&mut json, value);
            json.push(',');
        }
        json.push_str("\"context\":{");
        for (i, (key, value)) in self.context.iter().enumerate() {
            if i > 0 {
                json.push(',');
            }
            push_json_str(&mut json, key);
            json.push(':');
            push_json_str(&mut json, value);
        }
        json.push_str("}}");
        json
    }
}

impl fmt::Display for BasketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_user_string())
    }
}

impl std::error::Error for BasketError {}

/// Resultado padrão para operações da cesta.
pub type Result<T> = std::result::Result<T, BasketError>;

#[macro_export]
macro_rules! basket_err {
  ($code:expr) => {{
    $crate::basket::error::BasketError::new($code)
  }};
  ($code:expr, $($key:ident => $value:expr),+ $(,)?) => {{
    let mut err = $crate::basket::error::BasketError::new($code);
    $(
      err = err.with_context(stringify!($key), $value);
    )+
    err
  }};
  ($code:expr, { $($key:expr => $value:expr),+ $(,)? }) => {{
    let mut err = $crate::basket::error::BasketError::new($code);
    $(
      err = err.with_context($key, $value);
    )+
    err
  }};
  ($code:expr, $($key:expr => $value:expr),+ $(,)?) => {{
    let mut err = $crate::basket::error::BasketError::new($code);
    $(
      err = err.with_context($key, $value);
    )+
    err
  }};
}

#[macro_export]
macro_rules! basket_bail {
  ($($tt:tt)*) => {
    return Err($crate::basket_err!($($tt)*));
  };
}

impl From<BasketErrorCode> for BasketError {
    fn from(code: BasketErrorCode) -> Self {
        Self::new(code)
    }
}
