use serde::{Deserialize, Serialize};

/// A UniProt accession naming one protein record (e.g. `Q9XYZ1`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProteinId(pub String);

impl ProteinId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProteinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of one OMA group (seven uppercase letters, e.g. `NKRTAWQ`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Pfam family accession (e.g. `PF10181`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(pub String);

impl FamilyId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FamilyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UniProtKB section a protein record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Manually reviewed (Swiss-Prot)
    SwissProt,
    /// Automatically annotated (TrEMBL)
    Trembl,
}

impl ReviewStatus {
    /// Parse the UniProt "Reviewed" column (`reviewed` / `unreviewed`)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reviewed" => Some(Self::SwissProt),
            "unreviewed" => Some(Self::Trembl),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SwissProt => write!(f, "Swiss-Prot"),
            Self::Trembl => write!(f, "TrEMBL"),
        }
    }
}

/// Coarse taxonomic bucket used by the kingdom report layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kingdom {
    Archaea,
    Bacteria,
    Eukaryota,
    Fungi,
    Metazoa,
    Unknown,
    Viridiplantae,
    Viruses,
}

impl Kingdom {
    /// Classify a lineage (root first) by the first matching keyword.
    ///
    /// Rules are checked in a fixed order so that e.g. a fungal lineage, which
    /// also contains "Eukaryota", lands in `Fungi`.
    #[must_use]
    pub fn from_lineage(lineage: &[String]) -> Self {
        if lineage.is_empty() {
            return Self::Unknown;
        }

        let joined = lineage.join(" ").to_lowercase();

        if joined.contains("bacteria") {
            Self::Bacteria
        } else if joined.contains("archaea") {
            Self::Archaea
        } else if joined.contains("metazoa") {
            Self::Metazoa
        } else if joined.contains("viridiplantae") {
            Self::Viridiplantae
        } else if joined.contains("fungi") {
            Self::Fungi
        } else if joined.contains("eukaryota") {
            Self::Eukaryota
        } else if joined.contains("viruses") {
            Self::Viruses
        } else {
            Self::Unknown
        }
    }
}

impl std::fmt::Display for Kingdom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Archaea => "Archaea",
            Self::Bacteria => "Bacteria",
            Self::Eukaryota => "Eukaryota (other)",
            Self::Fungi => "Fungi",
            Self::Metazoa => "Metazoa",
            Self::Unknown => "Unknown",
            Self::Viridiplantae => "Viridiplantae",
            Self::Viruses => "Viruses",
        };
        write!(f, "{name}")
    }
}
