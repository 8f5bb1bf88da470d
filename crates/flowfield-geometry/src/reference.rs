use std::{fmt, str::FromStr};

use crate::error::GeometryError;

/// The image grid a flow field is indexed by.
///
/// A `Source` referenced field stores, at every pixel of the original image, where that pixel
/// moves to. A `Target` referenced field is indexed by the warped image and stores, at every
/// pixel of it, the displacement that brought the originating pixel there.
///
/// # Examples
///
/// ```
/// use flowfield_geometry::Reference;
///
/// let reference: Reference = "s".parse().unwrap();
/// assert_eq!(reference, Reference::Source);
/// assert_eq!(Reference::default(), Reference::Target);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Reference {
    /// Indexed by the original image grid.
    Source,
    /// Indexed by the warped image grid.
    #[default]
    Target,
}

impl Reference {
    /// Resolves an optional reference token, falling back to [`Reference::Target`].
    ///
    /// # Errors
    ///
    /// If the token is present but not recognized, an error is returned.
    pub fn from_token(token: Option<&str>) -> Result<Self, GeometryError> {
        match token {
            None => Ok(Self::default()),
            Some(token) => token.parse(),
        }
    }

    /// Short single-letter token of the reference.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "s",
            Self::Target => "t",
        }
    }
}

impl FromStr for Reference {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" | "source" => Ok(Self::Source),
            "t" | "target" => Ok(Self::Target),
            other => Err(GeometryError::InvalidReference(other.to_string())),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
