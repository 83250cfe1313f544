/// Failures surfaced by the FreeType bindings.
///
/// Every variant that originates in the engine carries the engine's last
/// error code at the time of the failing call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Couldn't initialize FreeType library, FreeType error code: {0}")]
    EngineInit(i32),
    #[error("Couldn't load font, FreeType error code: {0}")]
    FontLoad(i32),
    #[error("Couldn't create FreeType stroker, FreeType error code: {0}")]
    StrokerCreate(i32),
    #[error("Glyph is not yet rendered")]
    GlyphState,
    #[error("Couldn't render glyph, FreeType error code: {0}")]
    GlyphRaster(i32),
    #[error("Couldn't stroke glyph, FreeType error code: {0}")]
    GlyphStroke(i32),
    #[error("Couldn't get glyph, FreeType error code: {0}")]
    GlyphExtract(i32),
    #[error("Couldn't load glyph {index}, FreeType error code: {code}")]
    GlyphLoad { index: u32, code: i32 },
    #[error("Couldn't set face size, FreeType error code: {0}")]
    FaceSize(i32),
    #[error("Couldn't select charmap, FreeType error code: {0}")]
    Charmap(i32),
    #[error("FreeType library was already disposed")]
    LibraryDisposed,
}

impl Error {
    /// The engine error code, if the failure came from the engine.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::EngineInit(code)
            | Error::FontLoad(code)
            | Error::StrokerCreate(code)
            | Error::GlyphRaster(code)
            | Error::GlyphStroke(code)
            | Error::GlyphExtract(code)
            | Error::FaceSize(code)
            | Error::Charmap(code) => Some(*code),
            Error::GlyphLoad { code, .. } => Some(*code),
            Error::GlyphState | Error::LibraryDisposed => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_code() {
        assert_eq!(
            Error::FontLoad(2).to_string(),
            "Couldn't load font, FreeType error code: 2"
        );
        assert_eq!(Error::GlyphState.to_string(), "Glyph is not yet rendered");
    }

    #[test]
    fn test_code_accessor() {
        assert_eq!(Error::GlyphLoad { index: 4, code: 6 }.code(), Some(6));
        assert_eq!(Error::GlyphState.code(), None);
    }
}
