// Dataset Service - allocation, listing and content transfer over /restfiles

use crate::application::constants::{
    DEFAULT_DIRECTORY_BLOCKS, DEFAULT_TEXT_ENCODING, DIRECTORY_BLOCKS_THRESHOLD,
    MIN_RECOMMENDED_DIRECTORY_BLOCKS,
};
use crate::application::retry::{MemberUploadRetry, RetryDecision};
use crate::domain::dataset::{dataset_path_segment, BLOCK_SIZE_27920, RECORD_LENGTH_256};
use crate::domain::{
    validate_member_name, CreateDatasetRequest, Dataset, DatasetFilter, DatasetList,
    DatasetMember, DatasetTransfer, DatasetType, DomainError, DownloadRequest, MemberList,
    RecordFormat, Space, SpaceUnit, UploadRequest,
};
use crate::error::{Result, ZosmfError};
use crate::port::{ApiRequest, ZosmfTransport};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info};

const DS_ROOT: [&str; 2] = ["restfiles", "ds"];

const DIRECTORY_IO_GUIDANCE: &str = "This typically indicates:\n\
    1. Directory corruption - use ISPF 3.1 or IEBCOPY to repair\n\
    2. Insufficient directory space - reallocate PDS with more directory blocks\n\
    3. Member name conflicts - check for duplicate or invalid names";

const DIRECTORY_SEARCH_GUIDANCE: &str =
    "The PDS directory may need maintenance using ISPF utilities";

const DIRECTORY_LISTING_GUIDANCE: &str = "This may indicate directory corruption or \
    insufficient directory space. Consider using IEBCOPY or ISPF to repair the PDS directory";

fn ds_path(tail: &[&str]) -> Vec<String> {
    DS_ROOT
        .iter()
        .chain(tail)
        .map(|segment| segment.to_string())
        .collect()
}

/// Attach repair guidance to errors that point at a damaged PDS directory
fn with_directory_guidance(dataset: &str, member: &str, error: ZosmfError) -> ZosmfError {
    let text = error.to_string();
    let guidance = if text.contains("ISRZ002") || text.contains("I/O error") {
        DIRECTORY_IO_GUIDANCE
    } else if text.contains("LMFIND error") {
        DIRECTORY_SEARCH_GUIDANCE
    } else {
        return error;
    };

    ZosmfError::PdsDirectory {
        dataset: dataset.to_string(),
        member: member.to_string(),
        guidance,
        source: Box::new(error),
    }
}

/// Dataset operations against one z/OSMF session
#[derive(Clone)]
pub struct DatasetService {
    transport: Arc<dyn ZosmfTransport>,
    upload_retry: MemberUploadRetry,
}

impl DatasetService {
    pub fn new(transport: Arc<dyn ZosmfTransport>) -> Self {
        Self {
            transport,
            upload_retry: MemberUploadRetry::default(),
        }
    }

    /// Override the retry policy used by validated member uploads
    pub fn with_upload_retry(mut self, policy: MemberUploadRetry) -> Self {
        self.upload_retry = policy;
        self
    }

    /// List datasets.
    ///
    /// Without a name or volume the listing defaults to `<user>.*`. The
    /// organization filter is applied to the returned rows.
    pub async fn list_datasets(&self, filter: &DatasetFilter) -> Result<DatasetList> {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        let name = non_empty(&filter.name);
        let volume = non_empty(&filter.volume);

        let mut request = ApiRequest::get(ds_path(&[]));
        if name.is_none() && volume.is_none() {
            request = request.query("dslevel", format!("{}.*", self.transport.user()));
        }
        if let Some(name) = name {
            request = request.query("dslevel", name);
        }
        if let Some(volume) = volume {
            request = request.query("volser", volume);
        }
        if let Some(start) = non_empty(&filter.start) {
            request = request.query("start", start);
        }

        let request = request
            .header("X-IBM-Max-Items", filter.limit.unwrap_or(0).to_string())
            .header("X-IBM-Attributes", "base");

        let mut list: DatasetList = self
            .transport
            .execute(request)
            .await?
            .expect_status(&[200])?
            .json()?;

        if let Some(organization) = non_empty(&filter.organization) {
            list.datasets
                .retain(|ds| ds.organization.as_deref() == Some(organization.as_str()));
            list.returned_rows = list.datasets.len() as u32;
        }

        debug!(count = %list.datasets.len(), "Listed datasets");
        Ok(list)
    }

    /// Exact-name lookup through the listing API
    pub async fn get_dataset(&self, name: &str) -> Result<Dataset> {
        let list = self.list_datasets(&DatasetFilter::by_name(name)).await?;
        list.find(name)
            .cloned()
            .ok_or_else(|| ZosmfError::NotFound(format!("dataset not found: {}", name)))
    }

    /// Dataset attributes via `?metadata=true`, falling back to
    /// [`get_dataset`](Self::get_dataset) when the direct read fails.
    pub async fn get_dataset_info(&self, name: &str) -> Result<Dataset> {
        match self.get_dataset_metadata(name).await {
            Ok(dataset) => Ok(dataset),
            Err(e) => {
                debug!(dataset = %name, error = %e, "Metadata read failed, using listing");
                self.get_dataset(name).await
            }
        }
    }

    async fn get_dataset_metadata(&self, name: &str) -> Result<Dataset> {
        let request = ApiRequest::get(ds_path(&[name]))
            .query("metadata", "true")
            .header("Accept", "application/json");
        let response = self.transport.execute(request).await?;
        if response.status == 404 {
            return Err(ZosmfError::NotFound(format!("dataset not found: {}", name)));
        }
        response.expect_status(&[200])?.json()
    }

    pub async fn exists(&self, name: &str) -> Result<bool> {
        let list = self.list_datasets(&DatasetFilter::by_name(name)).await?;
        Ok(list.find(name).is_some())
    }

    /// `POST /restfiles/ds/<name>`; the request is sent as given
    pub async fn create_dataset(&self, request: &CreateDatasetRequest) -> Result<()> {
        let api_request = ApiRequest::post(ds_path(&[request.name.as_str()])).json(request.to_body());
        self.transport
            .execute(api_request)
            .await?
            .expect_status(&[200, 201])?;
        info!(
            dataset = %request.name,
            dsorg = %request.dataset_type,
            "Dataset created"
        );
        Ok(())
    }

    pub async fn delete_dataset(&self, name: &str) -> Result<()> {
        self.transport
            .execute(ApiRequest::delete(ds_path(&[name])))
            .await?
            .expect_status(&[200, 204])?;
        info!(dataset = %name, "Dataset deleted");
        Ok(())
    }

    /// Write text to a dataset or member, replacing its content
    pub async fn upload_content(&self, request: &UploadRequest) -> Result<()> {
        let target = dataset_path_segment(&request.dataset_name, request.member_name.as_deref());
        let api_request = ApiRequest::put(ds_path(&[target.as_str()])).text(request.content.as_str());
        self.transport
            .execute(api_request)
            .await?
            .expect_status(&[200, 201, 204])?;
        debug!(target = %target, bytes = %request.content.len(), "Content uploaded");
        Ok(())
    }

    pub async fn download_content(&self, request: &DownloadRequest) -> Result<String> {
        let target = dataset_path_segment(&request.dataset_name, request.member_name.as_deref());
        let mut api_request = ApiRequest::get(ds_path(&[target.as_str()]));
        if let Some(encoding) = request.encoding.as_deref().filter(|e| !e.is_empty()) {
            api_request = api_request.query("encoding", encoding);
        }
        let response = self
            .transport
            .execute(api_request)
            .await?
            .expect_status(&[200])?;
        Ok(response.body)
    }

    pub async fn list_members(&self, dataset: &str) -> Result<MemberList> {
        self.transport
            .execute(ApiRequest::get(ds_path(&[dataset, "member"])))
            .await?
            .expect_status(&[200])?
            .json()
    }

    /// A 200 on the member read means the member exists
    pub async fn get_member(&self, dataset: &str, member: &str) -> Result<DatasetMember> {
        let target = dataset_path_segment(dataset, Some(member));
        self.transport
            .execute(ApiRequest::get(ds_path(&[target.as_str()])))
            .await?
            .expect_status(&[200])?;
        Ok(DatasetMember {
            name: member.to_string(),
        })
    }

    pub async fn delete_member(&self, dataset: &str, member: &str) -> Result<()> {
        let target = dataset_path_segment(dataset, Some(member));
        self.transport
            .execute(ApiRequest::delete(ds_path(&[target.as_str()])))
            .await?
            .expect_status(&[200, 204])?;
        info!(dataset = %dataset, member = %member, "Member deleted");
        Ok(())
    }

    /// Copy a whole dataset; the PUT goes to the target
    pub async fn copy_sequential_dataset(&self, source: &str, target: &str) -> Result<()> {
        self.transfer(target, DatasetTransfer::copy(source, None))
            .await?;
        info!(source = %source, target = %target, "Dataset copied");
        Ok(())
    }

    pub async fn copy_member(
        &self,
        source: &str,
        source_member: &str,
        target: &str,
        target_member: &str,
    ) -> Result<()> {
        let target_segment = dataset_path_segment(target, Some(target_member));
        self.transfer(
            &target_segment,
            DatasetTransfer::copy(source, Some(source_member)),
        )
        .await?;
        info!(
            source = %source,
            source_member = %source_member,
            target = %target_segment,
            "Member copied"
        );
        Ok(())
    }

    pub async fn rename_dataset(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.transfer(new_name, DatasetTransfer::rename(old_name))
            .await?;
        info!(old_name = %old_name, new_name = %new_name, "Dataset renamed");
        Ok(())
    }

    async fn transfer(&self, target: &str, body: DatasetTransfer<'_>) -> Result<()> {
        let request = ApiRequest::put(ds_path(&[target])).json(serde_json::to_value(body)?);
        self.transport
            .execute(request)
            .await?
            .expect_status(&[200, 201])?;
        Ok(())
    }

    /// PS, 10/5 tracks, VB-style defaults (V, 256, 27920)
    pub async fn create_sequential_dataset(&self, name: &str) -> Result<()> {
        let request = CreateDatasetRequest {
            record_format: Some(RecordFormat::Variable),
            record_length: RECORD_LENGTH_256,
            block_size: BLOCK_SIZE_27920,
            ..CreateDatasetRequest::new(
                name,
                DatasetType::Sequential,
                Space::new(10, 5, SpaceUnit::Tracks),
            )
        };
        self.create_dataset(&request).await
    }

    /// PO, 10/5 tracks, 5 directory blocks
    pub async fn create_partitioned_dataset(&self, name: &str) -> Result<()> {
        let request = CreateDatasetRequest {
            record_format: Some(RecordFormat::Variable),
            record_length: RECORD_LENGTH_256,
            block_size: BLOCK_SIZE_27920,
            directory: DEFAULT_DIRECTORY_BLOCKS,
            ..CreateDatasetRequest::new(
                name,
                DatasetType::Partitioned,
                Space::default_allocation(SpaceUnit::Tracks),
            )
        };
        self.create_dataset(&request).await
    }

    pub async fn create_dataset_with_options(
        &self,
        name: &str,
        dataset_type: DatasetType,
        space: Space,
        record_format: Option<RecordFormat>,
        record_length: u32,
        block_size: u32,
    ) -> Result<()> {
        let directory = if dataset_type == DatasetType::Partitioned && space.directory == 0 {
            DEFAULT_DIRECTORY_BLOCKS
        } else {
            0
        };
        let request = CreateDatasetRequest {
            record_format,
            record_length,
            block_size,
            directory,
            ..CreateDatasetRequest::new(name, dataset_type, space)
        };
        self.create_dataset(&request).await
    }

    /// PDS with 20/10 tracks; fewer than 5 directory blocks become 10
    pub async fn create_pds_with_directory_space(
        &self,
        name: &str,
        directory_blocks: u32,
    ) -> Result<()> {
        let directory_blocks = if directory_blocks < DIRECTORY_BLOCKS_THRESHOLD {
            MIN_RECOMMENDED_DIRECTORY_BLOCKS
        } else {
            directory_blocks
        };
        let request = CreateDatasetRequest {
            record_format: Some(RecordFormat::Variable),
            record_length: RECORD_LENGTH_256,
            block_size: BLOCK_SIZE_27920,
            directory: directory_blocks,
            ..CreateDatasetRequest::new(
                name,
                DatasetType::Partitioned,
                Space {
                    directory: directory_blocks,
                    ..Space::new(20, 10, SpaceUnit::Tracks)
                },
            )
        };
        self.create_dataset(&request).await
    }

    pub async fn upload_text(&self, dataset: &str, content: &str) -> Result<()> {
        self.upload_content(&UploadRequest::new(dataset, content))
            .await
    }

    /// Upload to a member, with repair guidance on directory errors
    pub async fn upload_text_to_member(
        &self,
        dataset: &str,
        member: &str,
        content: &str,
    ) -> Result<()> {
        validate_member_name(member)?;
        let request = UploadRequest::new(dataset, content).with_member(member);
        self.upload_content(&request)
            .await
            .map_err(|e| with_directory_guidance(dataset, member, e))
    }

    /// Checked member upload.
    ///
    /// Verifies the member name, that the dataset exists and is partitioned
    /// (PO or PO-E) and that its directory can be listed, then uploads with
    /// the transient-fault retry policy.
    pub async fn upload_text_to_member_with_validation(
        &self,
        dataset: &str,
        member: &str,
        content: &str,
    ) -> Result<()> {
        validate_member_name(member)?;
        self.ensure_partitioned(dataset).await?;

        let members = self
            .list_members(dataset)
            .await
            .map_err(|e| ZosmfError::PdsDirectory {
                dataset: dataset.to_string(),
                member: member.to_string(),
                guidance: DIRECTORY_LISTING_GUIDANCE,
                source: Box::new(e),
            })?;
        debug!(
            dataset = %dataset,
            member = %member,
            replacing = %members.contains(member),
            "Uploading member"
        );

        let request = UploadRequest::new(dataset, content).with_member(member);
        self.upload_with_retry(&request)
            .await
            .map_err(|e| with_directory_guidance(dataset, member, e))
    }

    async fn upload_with_retry(&self, request: &UploadRequest) -> Result<()> {
        let mut attempt = 1;
        loop {
            let error = match self.upload_content(request).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };
            match self.upload_retry.should_retry(attempt, &error) {
                RetryDecision::Retry(delay) => {
                    sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::Failed => return Err(error),
                RetryDecision::Exhausted => {
                    return Err(ZosmfError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(error),
                    })
                }
            }
        }
    }

    /// Existence, partitioned organization and a readable directory
    pub async fn check_pds_directory_health(&self, dataset: &str) -> Result<()> {
        self.ensure_partitioned(dataset).await?;
        self.list_members(dataset).await?;
        Ok(())
    }

    async fn ensure_partitioned(&self, dataset: &str) -> Result<()> {
        if !self.exists(dataset).await? {
            return Err(ZosmfError::NotFound(format!(
                "dataset {} does not exist",
                dataset
            )));
        }

        let info = self.get_dataset(dataset).await?;
        if !info.is_partitioned() {
            return Err(DomainError::InvalidDatasetRequest(format!(
                "dataset {} is not a partitioned dataset (type: {})",
                dataset,
                info.organization.as_deref().unwrap_or("")
            ))
            .into());
        }
        Ok(())
    }

    pub async fn download_text(&self, dataset: &str) -> Result<String> {
        let request = DownloadRequest {
            encoding: Some(DEFAULT_TEXT_ENCODING.to_string()),
            ..DownloadRequest::new(dataset)
        };
        self.download_content(&request).await
    }

    pub async fn download_text_from_member(&self, dataset: &str, member: &str) -> Result<String> {
        let request = DownloadRequest {
            encoding: Some(DEFAULT_TEXT_ENCODING.to_string()),
            ..DownloadRequest::new(dataset).with_member(member)
        };
        self.download_content(&request).await
    }

    /// Datasets under the `<owner>.*` pattern
    pub async fn datasets_by_owner(&self, owner: &str, limit: u32) -> Result<DatasetList> {
        self.list_datasets(&DatasetFilter {
            name: Some(format!("{}.*", owner)),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    pub async fn datasets_by_type(&self, organization: &str, limit: u32) -> Result<DatasetList> {
        self.list_datasets(&DatasetFilter {
            organization: Some(organization.to_string()),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    pub async fn datasets_by_name(&self, pattern: &str, limit: u32) -> Result<DatasetList> {
        self.list_datasets(&DatasetFilter {
            name: Some(pattern.to_string()),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    pub async fn copy_member_to_same_dataset(
        &self,
        dataset: &str,
        source_member: &str,
        target_member: &str,
    ) -> Result<()> {
        self.copy_member(dataset, source_member, dataset, target_member)
            .await
    }

    pub async fn copy_member_with_same_name(
        &self,
        source: &str,
        target: &str,
        member: &str,
    ) -> Result<()> {
        self.copy_member(source, member, target, member).await
    }

    /// Release this handle to the session's connection pool
    pub fn close(self) {
        debug!(base_url = %self.transport.base_url(), "Dataset service closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::transport::mocks::MockTransport;
    use crate::port::{HttpMethod, RequestBody};
    use serde_json::json;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    const PDS_LISTING: &str =
        r#"{"items":[{"dsname":"IBMUSER.PDS","dsorg":"PO-E"}],"returnedRows":1,"JSONversion":1}"#;
    const SEQ_LISTING: &str =
        r#"{"items":[{"dsname":"IBMUSER.SEQ","dsorg":"PS"}],"returnedRows":1,"JSONversion":1}"#;
    const MEMBERS: &str = r#"{"items":[{"member":"OLD"}],"returnedRows":1,"JSONversion":1}"#;

    fn service(mock: &Arc<MockTransport>) -> DatasetService {
        DatasetService::new(mock.clone())
            .with_upload_retry(MemberUploadRetry::new(3, Duration::from_millis(1)))
    }

    #[tokio::test]
    async fn test_list_defaults_to_user_pattern() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(200, SEQ_LISTING);

        assert_ok!(service(&mock).list_datasets(&DatasetFilter::default()).await);

        let request = &mock.requests()[0];
        assert_eq!(request.path(), "/restfiles/ds");
        assert_eq!(
            request.query,
            vec![("dslevel".to_string(), "IBMUSER.*".to_string())]
        );
        assert_eq!(request.header_value("X-IBM-Max-Items"), Some("0"));
        assert_eq!(request.header_value("X-IBM-Attributes"), Some("base"));
    }

    #[tokio::test]
    async fn test_list_with_volume_and_limit() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(200, SEQ_LISTING);

        let filter = DatasetFilter {
            volume: Some("VOL001".into()),
            start: Some("IBMUSER.A".into()),
            limit: Some(25),
            ..Default::default()
        };
        assert_ok!(service(&mock).list_datasets(&filter).await);

        let request = &mock.requests()[0];
        assert_eq!(
            request.query,
            vec![
                ("volser".to_string(), "VOL001".to_string()),
                ("start".to_string(), "IBMUSER.A".to_string())
            ]
        );
        assert_eq!(request.header_value("X-IBM-Max-Items"), Some("25"));
    }

    #[tokio::test]
    async fn test_datasets_by_type_filters_rows() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(
            200,
            r#"{"items":[{"dsname":"A.PDS","dsorg":"PO"},{"dsname":"A.SEQ","dsorg":"PS"}],"returnedRows":2}"#,
        );

        let list = assert_ok!(service(&mock).datasets_by_type("PS", 10).await);
        assert_eq!(list.datasets.len(), 1);
        assert_eq!(list.returned_rows, 1);
        assert_eq!(list.datasets[0].name, "A.SEQ");
    }

    #[tokio::test]
    async fn test_get_dataset_not_found() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(200, SEQ_LISTING);

        let err = assert_err!(service(&mock).get_dataset("IBMUSER.OTHER").await);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_dataset_info_falls_back_to_listing() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(404, "");
        mock.push_response(200, SEQ_LISTING);

        let info = assert_ok!(service(&mock).get_dataset_info("IBMUSER.SEQ").await);
        assert_eq!(info.organization.as_deref(), Some("PS"));

        let requests = mock.requests();
        assert_eq!(requests[0].path(), "/restfiles/ds/IBMUSER.SEQ");
        assert_eq!(
            requests[0].query,
            vec![("metadata".to_string(), "true".to_string())]
        );
        assert_eq!(requests[1].path(), "/restfiles/ds");
    }

    #[tokio::test]
    async fn test_create_sequential_body() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(201, "");

        assert_ok!(service(&mock).create_sequential_dataset("IBMUSER.NEW").await);

        let request = &mock.requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.body,
            RequestBody::Json(json!({
                "dsname": "IBMUSER.NEW",
                "dsorg": "PS",
                "alcunit": "TRK",
                "primary": 10,
                "secondary": 5,
                "recfm": "V",
                "lrecl": 256,
                "blksize": 27920
            }))
        );
    }

    #[tokio::test]
    async fn test_pds_directory_minimum() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(201, "");

        assert_ok!(
            service(&mock)
                .create_pds_with_directory_space("IBMUSER.PDS", 2)
                .await
        );

        match &mock.requests()[0].body {
            RequestBody::Json(body) => {
                assert_eq!(body["dirblk"], 10);
                assert_eq!(body["primary"], 20);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_member_paths() {
        let mock = Arc::new(MockTransport::new("IBMUSER").with_fallback(200, ""));

        let datasets = service(&mock);
        assert_ok!(datasets.upload_text("IBMUSER.SEQ", "hello").await);
        assert_ok!(datasets.get_member("IBMUSER.PDS", "MEM1").await);
        assert_ok!(datasets.delete_member("IBMUSER.PDS", "MEM1").await);
        assert_ok!(datasets.download_text_from_member("IBMUSER.PDS", "MEM1").await);

        let requests = mock.requests();
        assert_eq!(requests[0].path(), "/restfiles/ds/IBMUSER.SEQ");
        assert_eq!(requests[0].body, RequestBody::Text("hello".to_string()));
        assert_eq!(requests[1].path(), "/restfiles/ds/IBMUSER.PDS(MEM1)");
        assert_eq!(requests[2].method, HttpMethod::Delete);
        assert_eq!(
            requests[3].query,
            vec![("encoding".to_string(), "UTF-8".to_string())]
        );
    }

    #[tokio::test]
    async fn test_copy_member_targets_destination() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(200, "");

        assert_ok!(
            service(&mock)
                .copy_member_to_same_dataset("IBMUSER.PDS", "SRC", "DST")
                .await
        );

        let request = &mock.requests()[0];
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.path(), "/restfiles/ds/IBMUSER.PDS(DST)");
        assert_eq!(
            request.body,
            RequestBody::Json(json!({
                "request": "copy",
                "from-dataset": {"dsn": "IBMUSER.PDS", "member": "SRC"}
            }))
        );
    }

    #[tokio::test]
    async fn test_upload_to_member_adds_guidance() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(500, "ISRZ002 Deallocation failed");

        let err = assert_err!(
            service(&mock)
                .upload_text_to_member("IBMUSER.PDS", "MEM1", "data")
                .await
        );
        assert!(matches!(err, ZosmfError::PdsDirectory { .. }));
        assert!(err.to_string().contains("IEBCOPY"));
        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_upload_to_member_rejects_bad_name_without_request() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));

        let err = assert_err!(
            service(&mock)
                .upload_text_to_member("IBMUSER.PDS", "TOOLONG12", "data")
                .await
        );
        assert!(matches!(err, ZosmfError::Domain(_)));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_validated_upload_retries_transient_errors() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(200, PDS_LISTING); // exists
        mock.push_response(200, PDS_LISTING); // get_dataset
        mock.push_response(200, MEMBERS);
        mock.push_response(500, "ISRZ002 Deallocation failed");
        mock.push_response(500, "LMFIND error");
        mock.push_response(201, "");

        assert_ok!(
            service(&mock)
                .upload_text_to_member_with_validation("IBMUSER.PDS", "NEW", "data")
                .await
        );
        assert_eq!(mock.request_count(), 6);
        assert_eq!(mock.requests()[5].path(), "/restfiles/ds/IBMUSER.PDS(NEW)");
    }

    #[tokio::test]
    async fn test_validated_upload_gives_up_after_three_attempts() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(200, PDS_LISTING);
        mock.push_response(200, PDS_LISTING);
        mock.push_response(200, MEMBERS);
        for _ in 0..3 {
            mock.push_response(500, "I/O error in directory");
        }

        let err = assert_err!(
            service(&mock)
                .upload_text_to_member_with_validation("IBMUSER.PDS", "NEW", "data")
                .await
        );
        assert_eq!(mock.request_count(), 6);
        match err {
            ZosmfError::PdsDirectory { source, .. } => {
                assert!(matches!(
                    *source,
                    ZosmfError::RetriesExhausted { attempts: 3, .. }
                ));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validated_upload_retries_timeout_and_connection_failures() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(200, PDS_LISTING);
        mock.push_response(200, PDS_LISTING);
        mock.push_response(200, MEMBERS);
        mock.push_error(ZosmfError::Timeout(
            "request timeout: operation timed out".to_string(),
        ));
        mock.push_error(ZosmfError::Transport(
            "connection failed: connection refused".to_string(),
        ));
        mock.push_response(204, "");

        assert_ok!(
            service(&mock)
                .upload_text_to_member_with_validation("IBMUSER.PDS", "NEW", "data")
                .await
        );
        assert_eq!(mock.request_count(), 6);
    }

    #[tokio::test]
    async fn test_validated_upload_exhausts_on_repeated_timeouts() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(200, PDS_LISTING);
        mock.push_response(200, PDS_LISTING);
        mock.push_response(200, MEMBERS);
        for _ in 0..3 {
            mock.push_error(ZosmfError::Timeout("request timeout".to_string()));
        }

        let err = assert_err!(
            service(&mock)
                .upload_text_to_member_with_validation("IBMUSER.PDS", "NEW", "data")
                .await
        );
        assert_eq!(mock.request_count(), 6);
        match err {
            ZosmfError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*source, ZosmfError::Timeout(_)));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validated_upload_permanent_error_not_retried() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(200, PDS_LISTING);
        mock.push_response(200, PDS_LISTING);
        mock.push_response(200, MEMBERS);
        mock.push_response(403, "not authorized");

        let err = assert_err!(
            service(&mock)
                .upload_text_to_member_with_validation("IBMUSER.PDS", "NEW", "data")
                .await
        );
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(mock.request_count(), 4);
    }

    #[tokio::test]
    async fn test_validated_upload_requires_partitioned() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(200, SEQ_LISTING);
        mock.push_response(200, SEQ_LISTING);

        let err = assert_err!(
            service(&mock)
                .upload_text_to_member_with_validation("IBMUSER.SEQ", "NEW", "data")
                .await
        );
        assert!(err.to_string().contains("not a partitioned dataset (type: PS)"));
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_directory_health_reports_unlistable_directory() {
        let mock = Arc::new(MockTransport::new("IBMUSER"));
        mock.push_response(200, PDS_LISTING);
        mock.push_response(200, PDS_LISTING);
        mock.push_response(500, "directory damaged");

        let err = assert_err!(
            service(&mock)
                .check_pds_directory_health("IBMUSER.PDS")
                .await
        );
        assert_eq!(err.status_code(), Some(500));
    }
}
