//! Channel name detection.

/// Extension trait for telling channel targets apart from nicknames.
pub trait ChannelExt {
    /// True if this names a channel (`#`, `&`, `+` or `!` prefix, no
    /// space, comma or BEL, at most 50 characters).
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        let Some(first) = self.chars().next() else {
            return false;
        };
        if !matches!(first, '#' | '&' | '+' | '!') {
            return false;
        }
        if self.chars().count() > 50 {
            return false;
        }
        !self.chars().any(|c| matches!(c, ' ' | ',' | '\x07'))
    }
}

impl ChannelExt for String {
    fn is_channel_name(&self) -> bool {
        self.as_str().is_channel_name()
    }
}
