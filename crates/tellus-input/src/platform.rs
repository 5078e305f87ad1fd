//! Pointer vs. touch platform detection.

/// The kind of input the host platform offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Mouse or trackpad with exclusive capture available.
    #[default]
    Pointer,
    /// Touch-first device; no precise pointer look.
    Touch,
}

impl Platform {
    /// The platform this binary was built for.
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            Self::Touch
        } else {
            Self::Pointer
        }
    }

    #[must_use]
    pub fn is_touch(self) -> bool {
        self == Self::Touch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    fn test_desktop_detects_pointer() {
        assert_eq!(Platform::detect(), Platform::Pointer);
        assert!(!Platform::detect().is_touch());
    }

    #[test]
    fn test_touch_flag() {
        assert!(Platform::Touch.is_touch());
    }
}
