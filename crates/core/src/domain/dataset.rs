// Dataset Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::naming::{validate_dataset_name, validate_member_name};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest record length / block size z/OS accepts
pub const MAX_RECORD_LENGTH: u32 = 32760;

/// Largest directory block count accepted for a PDS
pub const MAX_DIRECTORY_BLOCKS: u32 = 9999;

pub const RECORD_LENGTH_80: u32 = 80;
pub const RECORD_LENGTH_132: u32 = 132;
pub const RECORD_LENGTH_256: u32 = 256;
pub const RECORD_LENGTH_512: u32 = 512;

pub const BLOCK_SIZE_80: u32 = 80;
pub const BLOCK_SIZE_800: u32 = 800;
pub const BLOCK_SIZE_27920: u32 = 27920;
pub const BLOCK_SIZE_32760: u32 = 32760;

/// Dataset organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetType {
    #[serde(rename = "PS")]
    Sequential,
    #[serde(rename = "PO")]
    Partitioned,
    #[serde(rename = "PDSE")]
    Pdse,
    #[serde(rename = "VSAM")]
    Vsam,
}

impl DatasetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Sequential => "PS",
            DatasetType::Partitioned => "PO",
            DatasetType::Pdse => "PDSE",
            DatasetType::Vsam => "VSAM",
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit for space allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpaceUnit {
    #[serde(rename = "TRK")]
    Tracks,
    #[serde(rename = "CYL")]
    Cylinders,
    Kb,
    Mb,
    Gb,
}

impl SpaceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceUnit::Tracks => "TRK",
            SpaceUnit::Cylinders => "CYL",
            SpaceUnit::Kb => "KB",
            SpaceUnit::Mb => "MB",
            SpaceUnit::Gb => "GB",
        }
    }
}

/// Record format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordFormat {
    #[serde(rename = "F")]
    Fixed,
    #[serde(rename = "V")]
    Variable,
    #[serde(rename = "U")]
    Undefined,
}

impl RecordFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFormat::Fixed => "F",
            RecordFormat::Variable => "V",
            RecordFormat::Undefined => "U",
        }
    }
}

/// Space allocation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub primary: u32,
    pub secondary: u32,
    pub unit: SpaceUnit,
    /// Directory blocks, partitioned datasets only
    #[serde(default)]
    pub directory: u32,
}

impl Space {
    pub fn new(primary: u32, secondary: u32, unit: SpaceUnit) -> Self {
        Self {
            primary,
            secondary,
            unit,
            directory: 0,
        }
    }

    /// 10 primary, 5 secondary, 5 directory blocks
    pub fn default_allocation(unit: SpaceUnit) -> Self {
        Self {
            primary: 10,
            secondary: 5,
            unit,
            directory: 5,
        }
    }

    /// 100 primary, 50 secondary, 20 directory blocks
    pub fn large(unit: SpaceUnit) -> Self {
        Self {
            primary: 100,
            secondary: 50,
            unit,
            directory: 20,
        }
    }

    /// 5 primary, 2 secondary, 2 directory blocks
    pub fn small(unit: SpaceUnit) -> Self {
        Self {
            primary: 5,
            secondary: 2,
            unit,
            directory: 2,
        }
    }
}

/// Dataset attributes as returned by the list API (`X-IBM-Attributes: base`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "dsname")]
    pub name: String,
    /// Organization (PS, PO, PO-E, VS, ...)
    #[serde(default, rename = "dsorg", skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, rename = "vol", skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, rename = "blksz", skip_serializing_if = "Option::is_none")]
    pub block_size: Option<String>,
    #[serde(default, rename = "lrecl", skip_serializing_if = "Option::is_none")]
    pub record_length: Option<String>,
    #[serde(default, rename = "recfm", skip_serializing_if = "Option::is_none")]
    pub record_format: Option<String>,
    #[serde(default, rename = "catnm", skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(default, rename = "cdate", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, rename = "dev", skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, rename = "dsntp", skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<String>,
    #[serde(default, rename = "edate", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, rename = "extx", skip_serializing_if = "Option::is_none")]
    pub extents: Option<String>,
    #[serde(default, rename = "migr", skip_serializing_if = "Option::is_none")]
    pub migrated: Option<String>,
    #[serde(default, rename = "mvol", skip_serializing_if = "Option::is_none")]
    pub multi_volume: Option<String>,
    #[serde(default, rename = "ovf", skip_serializing_if = "Option::is_none")]
    pub overflow: Option<String>,
    #[serde(default, rename = "rdate", skip_serializing_if = "Option::is_none")]
    pub referenced_date: Option<String>,
    #[serde(default, rename = "sizex", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, rename = "spacu", skip_serializing_if = "Option::is_none")]
    pub space_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<String>,
    #[serde(default, rename = "vols", skip_serializing_if = "Option::is_none")]
    pub volumes: Option<String>,
}

impl Dataset {
    /// PO or PO-E
    pub fn is_partitioned(&self) -> bool {
        matches!(self.organization.as_deref(), Some("PO") | Some("PO-E"))
    }
}

/// A member entry in a partitioned dataset listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMember {
    #[serde(rename = "member")]
    pub name: String,
}

/// Dataset listing response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetList {
    #[serde(default, rename = "items")]
    pub datasets: Vec<Dataset>,
    #[serde(default, rename = "returnedRows")]
    pub returned_rows: u32,
    #[serde(default, rename = "moreRows")]
    pub more_rows: bool,
    #[serde(default, rename = "JSONversion")]
    pub json_version: u32,
}

impl DatasetList {
    pub fn find(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|ds| ds.name == name)
    }
}

/// Member listing response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberList {
    #[serde(default, rename = "items")]
    pub members: Vec<DatasetMember>,
    #[serde(default, rename = "returnedRows")]
    pub returned_rows: u32,
    #[serde(default, rename = "JSONversion")]
    pub json_version: u32,
}

impl MemberList {
    pub fn contains(&self, member: &str) -> bool {
        self.members.iter().any(|m| m.name == member)
    }
}

/// Request to allocate a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDatasetRequest {
    pub name: String,
    pub dataset_type: DatasetType,
    pub volume: Option<String>,
    pub space: Space,
    pub record_format: Option<RecordFormat>,
    /// 0 = let z/OSMF decide
    pub record_length: u32,
    /// 0 = let z/OSMF decide
    pub block_size: u32,
    pub directory: u32,
}

impl CreateDatasetRequest {
    pub fn new(name: impl Into<String>, dataset_type: DatasetType, space: Space) -> Self {
        Self {
            name: name.into(),
            dataset_type,
            volume: None,
            space,
            record_format: None,
            record_length: 0,
            block_size: 0,
            directory: 0,
        }
    }

    /// JSON body for `POST /restfiles/ds/<name>`. Optional attributes are
    /// only present when set.
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert("dsname".into(), self.name.clone().into());
        body.insert("dsorg".into(), self.dataset_type.as_str().into());

        if let Some(volume) = self.volume.as_deref().filter(|v| !v.is_empty()) {
            body.insert("vol".into(), volume.into());
        }
        if self.space.primary > 0 {
            body.insert("alcunit".into(), self.space.unit.as_str().into());
            body.insert("primary".into(), self.space.primary.into());
            body.insert("secondary".into(), self.space.secondary.into());
            if self.space.directory > 0 {
                body.insert("dirblk".into(), self.space.directory.into());
            }
        }
        if let Some(recfm) = self.record_format {
            body.insert("recfm".into(), recfm.as_str().into());
        }
        if self.record_length > 0 {
            body.insert("lrecl".into(), self.record_length.into());
        }
        if self.block_size > 0 {
            body.insert("blksize".into(), self.block_size.into());
        }
        if self.directory > 0 {
            body.insert("dirblk".into(), self.directory.into());
        }

        serde_json::Value::Object(body)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(DomainError::InvalidDatasetRequest(reason));

        validate_dataset_name(&self.name)?;

        if self.space.primary == 0 {
            return invalid("primary space allocation must be greater than 0".to_string());
        }
        if self.record_length > MAX_RECORD_LENGTH {
            return invalid(format!(
                "record length must be between 1 and {}",
                MAX_RECORD_LENGTH
            ));
        }
        if self.block_size > MAX_RECORD_LENGTH {
            return invalid(format!(
                "block size must be between 1 and {}",
                MAX_RECORD_LENGTH
            ));
        }
        if self.dataset_type == DatasetType::Partitioned && self.directory > MAX_DIRECTORY_BLOCKS {
            return invalid(format!(
                "directory blocks must be between 1 and {}",
                MAX_DIRECTORY_BLOCKS
            ));
        }
        Ok(())
    }
}

/// Request to write text to a dataset or member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub dataset_name: String,
    pub member_name: Option<String>,
    pub content: String,
    /// Informational only; uploads always go out as `text/plain`
    pub encoding: Option<String>,
}

impl UploadRequest {
    pub fn new(dataset_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            member_name: None,
            content: content.into(),
            encoding: None,
        }
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member_name = Some(member.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_dataset_name(&self.dataset_name)?;
        if let Some(member) = self.member_name.as_deref().filter(|m| !m.is_empty()) {
            validate_member_name(member)?;
        }
        if self.content.is_empty() {
            return Err(DomainError::InvalidDatasetRequest(
                "content cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request to read text from a dataset or member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub dataset_name: String,
    pub member_name: Option<String>,
    /// Forwarded as the `encoding` query parameter
    pub encoding: Option<String>,
}

impl DownloadRequest {
    pub fn new(dataset_name: impl Into<String>) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            member_name: None,
            encoding: None,
        }
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member_name = Some(member.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_dataset_name(&self.dataset_name)?;
        if let Some(member) = self.member_name.as_deref().filter(|m| !m.is_empty()) {
            validate_member_name(member)?;
        }
        Ok(())
    }
}

/// Filters for dataset listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetFilter {
    /// Name pattern, sent as `dslevel`
    pub name: Option<String>,
    /// Volume serial, sent as `volser`
    pub volume: Option<String>,
    /// First dataset name to return, sent as `start`
    pub start: Option<String>,
    /// Organization (`PS`, `PO`, ...), applied to the returned rows
    pub organization: Option<String>,
    /// `X-IBM-Max-Items`; 0 or unset means no limit
    pub limit: Option<u32>,
}

impl DatasetFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Body for the copy/rename PUT sent to the *target* dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetTransfer<'a> {
    pub request: &'static str,
    #[serde(rename = "from-dataset")]
    pub from_dataset: FromDataset<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FromDataset<'a> {
    pub dsn: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<&'a str>,
}

impl<'a> DatasetTransfer<'a> {
    pub fn copy(source: &'a str, member: Option<&'a str>) -> Self {
        Self {
            request: "copy",
            from_dataset: FromDataset {
                dsn: source,
                member,
            },
        }
    }

    pub fn rename(source: &'a str) -> Self {
        Self {
            request: "rename",
            from_dataset: FromDataset {
                dsn: source,
                member: None,
            },
        }
    }
}

/// `NAME` or `NAME(MEMBER)` path segment
pub fn dataset_path_segment(dataset: &str, member: Option<&str>) -> String {
    match member.filter(|m| !m.is_empty()) {
        Some(member) => format!("{}({})", dataset, member),
        None => dataset.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_body_includes_only_set_fields() {
        let request = CreateDatasetRequest::new(
            "USER.TEST.DATA",
            DatasetType::Sequential,
            Space::new(0, 0, SpaceUnit::Tracks),
        );
        assert_eq!(
            request.to_body(),
            json!({"dsname": "USER.TEST.DATA", "dsorg": "PS"})
        );
    }

    #[test]
    fn test_create_body_full() {
        let request = CreateDatasetRequest {
            volume: Some("VOL001".into()),
            record_format: Some(RecordFormat::Fixed),
            record_length: RECORD_LENGTH_80,
            block_size: BLOCK_SIZE_800,
            ..CreateDatasetRequest::new(
                "USER.PDS",
                DatasetType::Partitioned,
                Space::default_allocation(SpaceUnit::Cylinders),
            )
        };
        assert_eq!(
            request.to_body(),
            json!({
                "dsname": "USER.PDS",
                "dsorg": "PO",
                "vol": "VOL001",
                "alcunit": "CYL",
                "primary": 10,
                "secondary": 5,
                "dirblk": 5,
                "recfm": "F",
                "lrecl": 80,
                "blksize": 800
            })
        );
    }

    #[test]
    fn test_create_validation() {
        let ok = CreateDatasetRequest::new(
            "USER.DATA",
            DatasetType::Sequential,
            Space::default_allocation(SpaceUnit::Tracks),
        );
        assert!(ok.validate().is_ok());

        let bad_name = CreateDatasetRequest {
            name: "bad..name".into(),
            ..ok.clone()
        };
        assert!(bad_name.validate().is_err());

        let no_space = CreateDatasetRequest {
            space: Space::new(0, 1, SpaceUnit::Tracks),
            ..ok.clone()
        };
        assert!(no_space
            .validate()
            .unwrap_err()
            .to_string()
            .contains("primary space"));

        let huge_lrecl = CreateDatasetRequest {
            record_length: 40000,
            ..ok.clone()
        };
        assert!(huge_lrecl.validate().is_err());

        let huge_dir = CreateDatasetRequest {
            dataset_type: DatasetType::Partitioned,
            directory: 10000,
            ..ok
        };
        assert!(huge_dir
            .validate()
            .unwrap_err()
            .to_string()
            .contains("directory blocks"));
    }

    #[test]
    fn test_upload_and_download_validation() {
        assert!(UploadRequest::new("USER.DATA", "hello").validate().is_ok());
        assert!(UploadRequest::new("USER.DATA", "").validate().is_err());
        assert!(UploadRequest::new("USER.PDS", "x")
            .with_member("TOOLONG12")
            .validate()
            .is_err());

        assert!(DownloadRequest::new("USER.PDS")
            .with_member("MEM1")
            .validate()
            .is_ok());
        assert!(DownloadRequest::new("user.pds").validate().is_err());
    }

    #[test]
    fn test_transfer_bodies() {
        assert_eq!(
            serde_json::to_value(DatasetTransfer::copy("SRC.DATA", None)).unwrap(),
            json!({"request": "copy", "from-dataset": {"dsn": "SRC.DATA"}})
        );
        assert_eq!(
            serde_json::to_value(DatasetTransfer::copy("SRC.PDS", Some("MEM1"))).unwrap(),
            json!({"request": "copy", "from-dataset": {"dsn": "SRC.PDS", "member": "MEM1"}})
        );
        assert_eq!(
            serde_json::to_value(DatasetTransfer::rename("OLD.NAME")).unwrap(),
            json!({"request": "rename", "from-dataset": {"dsn": "OLD.NAME"}})
        );
    }

    #[test]
    fn test_dataset_list_parsing() {
        let list: DatasetList = serde_json::from_str(
            r#"{"items":[{"dsname":"USER.PDS","dsorg":"PO-E","vol":"VOL001","recfm":"FB","lrecl":"80"},
                         {"dsname":"USER.SEQ","dsorg":"PS"}],
                "returnedRows":2,"moreRows":false,"JSONversion":1}"#,
        )
        .unwrap();

        assert_eq!(list.returned_rows, 2);
        assert!(list.find("USER.PDS").unwrap().is_partitioned());
        assert!(!list.find("USER.SEQ").unwrap().is_partitioned());
        assert!(list.find("USER.NONE").is_none());
    }

    #[test]
    fn test_space_presets() {
        assert_eq!(Space::default_allocation(SpaceUnit::Tracks).primary, 10);
        assert_eq!(Space::large(SpaceUnit::Cylinders).directory, 20);
        assert_eq!(Space::small(SpaceUnit::Mb).secondary, 2);
    }

    #[test]
    fn test_dataset_path_segment() {
        assert_eq!(dataset_path_segment("USER.PDS", Some("MEM1")), "USER.PDS(MEM1)");
        assert_eq!(dataset_path_segment("USER.SEQ", None), "USER.SEQ");
        assert_eq!(dataset_path_segment("USER.SEQ", Some("")), "USER.SEQ");
    }
}
