use std::fmt;

/// Categories of artwork a Jellyfin item can carry.
///
/// Names follow the server's `ImageType` enum, which is also how the API keys
/// its `ImageTags` map. `Primary` is the poster for series, seasons and movies;
/// for episodes the server's primary image is the episode still and is modelled
/// as [`ImageKind::Thumb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageKind {
    Primary,
    Banner,
    Thumb,
    Backdrop,
    Logo,
    Art,
    Disc,
}

impl ImageKind {
    pub const ALL: [ImageKind; 7] = [
        ImageKind::Primary,
        ImageKind::Banner,
        ImageKind::Thumb,
        ImageKind::Backdrop,
        ImageKind::Logo,
        ImageKind::Art,
        ImageKind::Disc,
    ];

    /// Kinds a series, season or movie exports only when extra artwork is
    /// requested.
    pub const EXTRA_ARTWORK: [ImageKind; 5] = [
        ImageKind::Thumb,
        ImageKind::Backdrop,
        ImageKind::Logo,
        ImageKind::Art,
        ImageKind::Disc,
    ];

    /// Server-side `ImageType` name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Primary => "Primary",
            ImageKind::Banner => "Banner",
            ImageKind::Thumb => "Thumb",
            ImageKind::Backdrop => "Backdrop",
            ImageKind::Logo => "Logo",
            ImageKind::Art => "Art",
            ImageKind::Disc => "Disc",
        }
    }

    /// ASCII-case-insensitive lookup by server name. Types jellyart does not
    /// export (`Box`, `Screenshot`, `Chapter`, ...) yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        ImageKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(ImageKind::parse("primary"), Some(ImageKind::Primary));
        assert_eq!(ImageKind::parse("BANNER"), Some(ImageKind::Banner));
        assert_eq!(ImageKind::parse("Screenshot"), None);
    }
}
