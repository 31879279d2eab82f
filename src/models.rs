// Data models for the repair log

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Statut assigned to every record at creation. No transition logic exists.
pub const STATUT_INITIAL: &str = "En cours";

/// Sentinel stored in `Image_Path` when no evidence file was uploaded.
pub const NO_EVIDENCE: &str = "Aucune";

/// One repair ticket, one CSV row.
///
/// Field order matches the on-disk column order; serde renames carry the
/// exact header names of the backing file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "ID_Unique")]
    pub id_unique: String,
    #[serde(rename = "Client_Nom")]
    pub client_nom: String,
    #[serde(rename = "Client_Type")]
    pub client_type: ClientType,
    #[serde(rename = "Appareil_Marque")]
    pub appareil_marque: Marque,
    #[serde(rename = "Appareil_Modele")]
    pub appareil_modele: String,
    #[serde(rename = "Probleme")]
    pub probleme: String,
    #[serde(rename = "Diagnostic")]
    pub diagnostic: String,
    #[serde(rename = "Prix_Devis")]
    pub prix_devis: u32,
    #[serde(rename = "Prix_Final")]
    pub prix_final: u32,
    #[serde(rename = "Statut")]
    pub statut: String,
    #[serde(rename = "Image_Path")]
    pub image_path: String,
}

/// Operator-entered fields of a new intervention, before the system-derived
/// ones (date, ID, statut) are attached.
#[derive(Debug, Clone)]
pub struct Intake {
    pub client_nom: String,
    pub client_type: ClientType,
    pub appareil_marque: Marque,
    pub appareil_modele: String,
    pub probleme: String,
    pub diagnostic: String,
    pub prix_devis: u32,
    pub prix_final: u32,
}

impl RepairRecord {
    /// Build a record from an intake at the given creation instant.
    ///
    /// `ID_Unique` is the creation timestamp at minute granularity: two
    /// records created within the same minute share an ID. Known gap,
    /// inherited from the data already on disk.
    pub fn new(intake: Intake, now: NaiveDateTime) -> Self {
        Self {
            date: now.format("%Y-%m-%d %H:%M").to_string(),
            id_unique: now.format("%Y%m%d%H%M").to_string(),
            client_nom: intake.client_nom,
            client_type: intake.client_type,
            appareil_marque: intake.appareil_marque,
            appareil_modele: intake.appareil_modele,
            probleme: intake.probleme,
            diagnostic: intake.diagnostic,
            prix_devis: intake.prix_devis,
            prix_final: intake.prix_final,
            statut: STATUT_INITIAL.to_string(),
            image_path: NO_EVIDENCE.to_string(),
        }
    }

    pub fn has_evidence(&self) -> bool {
        self.image_path != NO_EVIDENCE
    }
}

/// Client relationship category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientType {
    Nouveau,
    Ancien,
    #[serde(rename = "Recommandé")]
    Recommande,
}

impl ClientType {
    pub const ALL: [ClientType; 3] =
        [ClientType::Nouveau, ClientType::Ancien, ClientType::Recommande];

    pub fn label(self) -> &'static str {
        match self {
            ClientType::Nouveau => "Nouveau",
            ClientType::Ancien => "Ancien",
            ClientType::Recommande => "Recommandé",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == s)
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Device brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marque {
    Apple,
    Samsung,
    Google,
    Xiaomi,
    #[serde(rename = "Tecno/Infinix")]
    TecnoInfinix,
    Autre,
}

impl Marque {
    pub const ALL: [Marque; 6] = [
        Marque::Apple,
        Marque::Samsung,
        Marque::Google,
        Marque::Xiaomi,
        Marque::TecnoInfinix,
        Marque::Autre,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Marque::Apple => "Apple",
            Marque::Samsung => "Samsung",
            Marque::Google => "Google",
            Marque::Xiaomi => "Xiaomi",
            Marque::TecnoInfinix => "Tecno/Infinix",
            Marque::Autre => "Autre",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == s)
    }
}

impl std::fmt::Display for Marque {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Current local wall-clock time, without offset.
pub fn now_local() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
