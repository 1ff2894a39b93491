//! Design service offered on the contact form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a service value is not one of the known packages.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown service: {0}")]
pub struct ServiceKindError(pub String);

/// A service package a prospect can ask about.
///
/// The wire value is the kebab-case form used by the contact form's
/// `<select>` options (for example `logo-only`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    PaketStarter,
    PaketUmkm,
    PaketBusiness,
    PaketMahasiswa,
    LogoOnly,
    SocialMedia,
    Brosur,
    Lainnya,
}

impl ServiceKind {
    /// Every service, in the order the form lists them.
    pub const ALL: [Self; 8] = [
        Self::PaketStarter,
        Self::PaketUmkm,
        Self::PaketBusiness,
        Self::PaketMahasiswa,
        Self::LogoOnly,
        Self::SocialMedia,
        Self::Brosur,
        Self::Lainnya,
    ];

    /// The form/storage value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PaketStarter => "paket-starter",
            Self::PaketUmkm => "paket-umkm",
            Self::PaketBusiness => "paket-business",
            Self::PaketMahasiswa => "paket-mahasiswa",
            Self::LogoOnly => "logo-only",
            Self::SocialMedia => "social-media",
            Self::Brosur => "brosur",
            Self::Lainnya => "lainnya",
        }
    }

    /// Human-readable package name, as shown in emails and the dashboard.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PaketStarter => "Paket Starter",
            Self::PaketUmkm => "Paket UMKM Premium",
            Self::PaketBusiness => "Paket Business Growth",
            Self::PaketMahasiswa => "Paket Mahasiswa",
            Self::LogoOnly => "Logo Only",
            Self::SocialMedia => "Social Media Kit",
            Self::Brosur => "Brosur/Flyer",
            Self::Lainnya => "Lainnya",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceKind {
    type Err = ServiceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ServiceKindError(s.to_owned()))
    }
}
