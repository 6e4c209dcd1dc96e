//! Codec configuration

use jsonhook_format::Limits;

/// Options shared by encode and decode calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Forward decode-side hook errors unchanged. When false, they are rebuilt
    /// from their message text and lose their type.
    pub preserve_error_identity: bool,
    /// Minify marshal hook output before splicing it. When false the output
    /// is still validated and spliced with its inner whitespace intact.
    pub compact_hook_output: bool,
    /// Escape `<`, `>` and `&` in strings, including compacted hook output
    pub escape_html: bool,
    /// Reject object members that a target does not accept
    pub deny_unknown_fields: bool,
    /// Scanner limits
    pub limits: Limits,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            preserve_error_identity: true,
            compact_hook_output: true,
            escape_html: true,
            deny_unknown_fields: false,
            limits: Limits::default(),
        }
    }
}

impl CodecOptions {
    /// Set [`preserve_error_identity`](Self::preserve_error_identity)
    pub fn with_preserve_error_identity(mut self, preserve: bool) -> Self {
        self.preserve_error_identity = preserve;
        self
    }

    /// Set [`compact_hook_output`](Self::compact_hook_output)
    pub fn with_compact_hook_output(mut self, compact: bool) -> Self {
        self.compact_hook_output = compact;
        self
    }

    /// Set [`escape_html`](Self::escape_html)
    pub fn with_escape_html(mut self, escape: bool) -> Self {
        self.escape_html = escape;
        self
    }

    /// Set [`deny_unknown_fields`](Self::deny_unknown_fields)
    pub fn with_deny_unknown_fields(mut self, deny: bool) -> Self {
        self.deny_unknown_fields = deny;
        self
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.limits.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_compliant() {
        let opts = CodecOptions::default();
        assert!(opts.preserve_error_identity);
        assert!(opts.compact_hook_output);
        assert!(opts.escape_html);
        assert!(!opts.deny_unknown_fields);
        assert_eq!(opts.limits.max_depth, 128);
    }

    #[test]
    fn test_builders() {
        let opts = CodecOptions::default()
            .with_preserve_error_identity(false)
            .with_compact_hook_output(false)
            .with_escape_html(false)
            .with_deny_unknown_fields(true)
            .with_max_depth(8);
        assert!(!opts.preserve_error_identity);
        assert!(!opts.compact_hook_output);
        assert!(!opts.escape_html);
        assert!(opts.deny_unknown_fields);
        assert_eq!(opts.limits.max_depth, 8);
    }
}
