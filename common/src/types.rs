//! 車両レコードの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - VehicleField: 既知フィールド（ワイヤ上のキー名を持つ）
//! - VehicleRecord: 1台分の属性。既知フィールドはOption、それ以外はextraに保持

use serde::ser::{Serialize, SerializeMap, Serializer};

/// APIが返す既知フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VehicleField {
    VehicleNo,
    Imei,
    Status,
    VehicleName,
    Company,
    Branch,
    Project,
    InstallationDate,
    LastUpdated,
    Domain,
}

impl VehicleField {
    /// 既知フィールド一覧（テーブルの列順）
    pub const ALL: [VehicleField; 10] = [
        VehicleField::VehicleNo,
        VehicleField::Imei,
        VehicleField::Status,
        VehicleField::VehicleName,
        VehicleField::Company,
        VehicleField::Branch,
        VehicleField::Project,
        VehicleField::InstallationDate,
        VehicleField::LastUpdated,
        VehicleField::Domain,
    ];

    /// ペイロード上のキー名
    pub fn key(&self) -> &'static str {
        match self {
            VehicleField::VehicleNo => "Vehicle no",
            VehicleField::Imei => "Imei",
            VehicleField::Status => "vehicle status",
            VehicleField::VehicleName => "Vehicle name",
            VehicleField::Company => "Company",
            VehicleField::Branch => "Branch",
            VehicleField::Project => "Project",
            VehicleField::InstallationDate => "Installation date",
            VehicleField::LastUpdated => "Vehicle Last updated DateTime",
            VehicleField::Domain => "domain",
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            VehicleField::VehicleNo => "Vehicle No",
            VehicleField::Imei => "Imei",
            VehicleField::Status => "Status",
            VehicleField::VehicleName => "Type",
            VehicleField::Company => "Company",
            VehicleField::Branch => "Branch",
            VehicleField::Project => "Project",
            VehicleField::InstallationDate => "Installation Date",
            VehicleField::LastUpdated => "Last Updated",
            VehicleField::Domain => "Platform",
        }
    }

    /// キー名から既知フィールドを引く（完全一致）
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }
}

impl std::fmt::Display for VehicleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for VehicleField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "vehicle no" | "no" => Ok(VehicleField::VehicleNo),
            "imei" => Ok(VehicleField::Imei),
            "vehicle status" | "status" => Ok(VehicleField::Status),
            "vehicle name" | "vehicle type" | "type" => Ok(VehicleField::VehicleName),
            "company" => Ok(VehicleField::Company),
            "branch" => Ok(VehicleField::Branch),
            "project" => Ok(VehicleField::Project),
            "installation date" | "installed" => Ok(VehicleField::InstallationDate),
            "vehicle last updated datetime" | "last updated" | "updated" => {
                Ok(VehicleField::LastUpdated)
            }
            "domain" | "platform" => Ok(VehicleField::Domain),
            _ => Err(format!("Unknown field: {}", s)),
        }
    }
}

/// 車両1台分のレコード
///
/// 既知フィールドは欠落しうるのでOptionで持つ。
/// ペイロードのキー順を覚えておき、エクスポートの列順に使う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleRecord {
    pub vehicle_no: Option<String>,
    pub imei: Option<String>,
    pub status: Option<String>,
    pub vehicle_name: Option<String>,
    pub company: Option<String>,
    pub branch: Option<String>,
    pub project: Option<String>,
    pub installation_date: Option<String>,
    pub last_updated: Option<String>,
    pub domain: Option<String>,

    /// 既知フィールド以外の文字列フィールド（ペイロード順）
    pub extra: Vec<(String, String)>,

    order: Vec<String>,
}

impl VehicleRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// (キー, 値) の列から生成する
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            record.set(key.as_ref(), value);
        }
        record
    }

    /// 既知フィールドの値
    pub fn get(&self, field: VehicleField) -> Option<&str> {
        match field {
            VehicleField::VehicleNo => self.vehicle_no.as_deref(),
            VehicleField::Imei => self.imei.as_deref(),
            VehicleField::Status => self.status.as_deref(),
            VehicleField::VehicleName => self.vehicle_name.as_deref(),
            VehicleField::Company => self.company.as_deref(),
            VehicleField::Branch => self.branch.as_deref(),
            VehicleField::Project => self.project.as_deref(),
            VehicleField::InstallationDate => self.installation_date.as_deref(),
            VehicleField::LastUpdated => self.last_updated.as_deref(),
            VehicleField::Domain => self.domain.as_deref(),
        }
    }

    fn slot_mut(&mut self, field: VehicleField) -> &mut Option<String> {
        match field {
            VehicleField::VehicleNo => &mut self.vehicle_no,
            VehicleField::Imei => &mut self.imei,
            VehicleField::Status => &mut self.status,
            VehicleField::VehicleName => &mut self.vehicle_name,
            VehicleField::Company => &mut self.company,
            VehicleField::Branch => &mut self.branch,
            VehicleField::Project => &mut self.project,
            VehicleField::InstallationDate => &mut self.installation_date,
            VehicleField::LastUpdated => &mut self.last_updated,
            VehicleField::Domain => &mut self.domain,
        }
    }

    /// キー名で値を取得（既知・extraどちらも）
    pub fn value(&self, name: &str) -> Option<&str> {
        match VehicleField::from_key(name) {
            Some(field) => self.get(field),
            None => self
                .extra
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
        }
    }

    /// キー名で値を設定する。初出のキーは列順の末尾に追加
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match VehicleField::from_key(name) {
            Some(field) => *self.slot_mut(field) = Some(value),
            None => match self.extra.iter_mut().find(|(k, _)| k == name) {
                Some(entry) => entry.1 = value,
                None => self.extra.push((name.to_string(), value)),
            },
        }
        if !self.order.iter().any(|k| k == name) {
            self.order.push(name.to_string());
        }
    }

    /// 値を持つ列を (キー, 値) で返す
    ///
    /// ペイロードのキー順。順序情報のない既知フィールドは末尾に既知順で付く。
    pub fn columns(&self) -> Vec<(&str, &str)> {
        let mut columns: Vec<(&str, &str)> = self
            .order
            .iter()
            .filter_map(|name| self.value(name).map(|v| (name.as_str(), v)))
            .collect();

        for field in VehicleField::ALL {
            if let Some(v) = self.get(field) {
                if !self.order.iter().any(|k| k == field.key()) {
                    columns.push((field.key(), v));
                }
            }
        }

        columns
    }

    /// 全フィールドの値
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.columns().into_iter().map(|(_, v)| v)
    }
}

impl Serialize for VehicleRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let columns = self.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (key, value) in columns {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
