//! Canonical artifact naming.
//!
//! The remote repository only accepts files named
//! `<artifactId>-<version>[-<classifier>].<ext>`. Build tools name their
//! outputs however they like (`publishTest-prod-release.aar`,
//! `pom-default.xml`, `module.json.asc`), so every staged file is renamed by
//! [`NamingRules::canonical_name`].

use super::ArtifactRole;
use crate::config::Coordinates;

/// Target assumed for a signature whose name matches no known suffix.
///
/// Descriptor generators commonly sign `pom-default.xml` under names that
/// say nothing about the signed file, so the default assumes the POM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureFallback {
    /// Treat it as the POM signature.
    #[default]
    Pom,
    /// Treat it as the module descriptor signature.
    Module,
    /// Treat it as the primary binary signature.
    Main,
    /// Skip it.
    Reject,
}

impl std::str::FromStr for SignatureFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pom" => Ok(Self::Pom),
            "module" => Ok(Self::Module),
            "main" => Ok(Self::Main),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown signature fallback '{other}' (expected pom, module, main or reject)"
            )),
        }
    }
}

/// Why a file could not be given a canonical name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    /// A file with the signature role does not end in `.asc`.
    #[error("{file_name} is not a detached signature")]
    NotASignature {
        /// Offending file name.
        file_name: String,
    },

    /// The signed file could not be determined.
    #[error("cannot tell which artifact {file_name} signs")]
    UnresolvedSignature {
        /// Offending file name.
        file_name: String,
    },
}

/// Maps discovered files to canonical names for one set of coordinates.
///
/// Pure: the same inputs always produce the same name.
///
/// # Examples
///
/// ```
/// use central_portal_bundler::bundler::{ArtifactRole, NamingRules, SignatureFallback};
/// use central_portal_bundler::config::Coordinates;
///
/// let coords = Coordinates::new("com.example", "foo", "1.0.0").unwrap();
/// let rules = NamingRules::new(coords, "aar", SignatureFallback::Pom);
///
/// assert_eq!(
///     rules.canonical_name("foo-release.aar", ArtifactRole::Main, "aar").unwrap(),
///     "foo-1.0.0.aar"
/// );
/// assert_eq!(
///     rules.canonical_name("pom-default.xml.asc", ArtifactRole::Signature, "asc").unwrap(),
///     "foo-1.0.0.pom.asc"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct NamingRules {
    coordinates: Coordinates,
    binary_extension: String,
    fallback: SignatureFallback,
}

impl NamingRules {
    /// Rules for `coordinates`, where the primary binary has
    /// `binary_extension`.
    pub fn new(
        coordinates: Coordinates,
        binary_extension: impl Into<String>,
        fallback: SignatureFallback,
    ) -> Self {
        Self {
            coordinates,
            binary_extension: binary_extension.into(),
            fallback,
        }
    }

    /// Canonical name for a file of `role` named `file_name`.
    ///
    /// `extension` is used for the primary binary and classified jars;
    /// descriptors always get `.pom` / `.module`. Signatures are named after
    /// the file they sign, resolved from `file_name`.
    pub fn canonical_name(
        &self,
        file_name: &str,
        role: ArtifactRole,
        extension: &str,
    ) -> Result<String, NamingError> {
        let base = self.coordinates.base_name();
        match role {
            ArtifactRole::Main => Ok(format!("{base}.{extension}")),
            ArtifactRole::Sources | ArtifactRole::Javadoc => {
                let classifier = role.classifier().unwrap_or_default();
                Ok(format!("{base}-{classifier}.{extension}"))
            }
            ArtifactRole::Pom => Ok(format!("{base}.pom")),
            ArtifactRole::Module => Ok(format!("{base}.module")),
            ArtifactRole::Signature => {
                let target = self.signed_role(file_name)?;
                let target_extension = match target {
                    ArtifactRole::Sources | ArtifactRole::Javadoc => "jar",
                    _ => self.binary_extension.as_str(),
                };
                let signed = self.canonical_name(file_name, target, target_extension)?;
                Ok(format!("{signed}.asc"))
            }
        }
    }

    /// Role of the file a signature signs, judged by its name.
    fn signed_role(&self, file_name: &str) -> Result<ArtifactRole, NamingError> {
        let signed = file_name
            .strip_suffix(".asc")
            .ok_or_else(|| NamingError::NotASignature {
                file_name: file_name.to_string(),
            })?;

        if signed.ends_with(".pom") || signed.ends_with(".xml") {
            return Ok(ArtifactRole::Pom);
        }
        if signed.ends_with(".module") || signed.ends_with("module.json") {
            return Ok(ArtifactRole::Module);
        }
        if signed
            .strip_suffix(self.binary_extension.as_str())
            .is_some_and(|rest| rest.ends_with('.'))
        {
            return Ok(ArtifactRole::Main);
        }
        if signed.ends_with(".jar") {
            return if signed.contains("javadoc") {
                Ok(ArtifactRole::Javadoc)
            } else if signed.contains("sources") {
                Ok(ArtifactRole::Sources)
            } else {
                Err(NamingError::UnresolvedSignature {
                    file_name: file_name.to_string(),
                })
            };
        }

        match self.fallback {
            SignatureFallback::Pom => Ok(ArtifactRole::Pom),
            SignatureFallback::Module => Ok(ArtifactRole::Module),
            SignatureFallback::Main => Ok(ArtifactRole::Main),
            SignatureFallback::Reject => Err(NamingError::UnresolvedSignature {
                file_name: file_name.to_string(),
            }),
        }
    }
}
