//! Struct-based units of work.

use crate::error::BoxError;
use async_trait::async_trait;

/// A named unit of work that a caller can run with retries.
///
/// Closures cover most uses; implement this trait when the work carries its
/// own state or configuration and deserves a name in logs.
///
/// # Examples
///
/// ```
/// use reattempt_core::{BoxError, Operation};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct FetchQuote {
///     symbol: String,
/// }
///
/// #[async_trait]
/// impl Operation for FetchQuote {
///     type Output = f64;
///
///     async fn run(&self) -> Result<f64, BoxError> {
///         if self.symbol.is_empty() {
///             return Err("empty symbol".into());
///         }
///         Ok(101.5)
///     }
/// }
///
/// assert_eq!(FetchQuote { symbol: "ACME".into() }.name(), "FetchQuote");
/// ```
#[async_trait]
pub trait Operation: Send + Sync {
    /// Value produced by a successful run.
    type Output: Send;

    /// Performs one attempt.
    async fn run(&self) -> Result<Self::Output, BoxError>;

    /// Returns the label used for the call. Defaults to the type name
    /// without module paths, generic arguments included.
    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Strips the module path from every type in `full_name`.
fn short_type_name(full_name: &str) -> String {
    let mut short = String::with_capacity(full_name.len());
    let mut start = 0;
    for (i, c) in full_name.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';') {
            short.push_str(last_segment(&full_name[start..i]));
            short.push(c);
            start = i + c.len_utf8();
        }
    }
    short.push_str(last_segment(&full_name[start..]));
    short
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
