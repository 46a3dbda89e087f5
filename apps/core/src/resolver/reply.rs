use serde::{Deserialize, Serialize};

/// Reply to a single query.
///
/// `handled` is `false` only when the query was judged not to be math at all;
/// errors inside the math pipeline are handled replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathReply {
    pub handled: bool,
    pub reply: String,
}

impl MathReply {
    pub fn handled(reply: impl Into<String>) -> Self {
        Self {
            handled: true,
            reply: reply.into(),
        }
    }

    pub fn not_handled(reply: impl Into<String>) -> Self {
        Self {
            handled: false,
            reply: reply.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_flat_object() {
        let json = serde_json::to_string(&MathReply::handled("Result: 4.0")).unwrap();
        assert_eq!(json, r#"{"handled":true,"reply":"Result: 4.0"}"#);
    }
}
