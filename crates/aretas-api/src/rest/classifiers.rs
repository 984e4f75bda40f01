// Data classifier and classifier record endpoints

use super::call::ApiRequest;
use super::client::AretasClient;
use crate::error::Error;
use crate::models::{DataClassifier, DataClassifierRecord, Mac, Payload, WebServiceBoolean, WriteIntent};

/// Default row cap for `classifier_records_by_mac_timestamp`.
pub const DEFAULT_RECORD_LIMIT: u64 = 200_000;

// ── Classifiers ──────────────────────────────────────────────────────

impl AretasClient {
    /// `GET dataclassifier/list`
    pub async fn list_data_classifiers(&self) -> Result<Option<Vec<DataClassifier>>, Error> {
        self.fetch_list(&ApiRequest::get("dataclassifier/list")).await
    }

    /// `POST dataclassifier/create`. The id is left out of the body.
    pub async fn create_data_classifier(
        &self,
        classifier: &DataClassifier,
    ) -> Result<WebServiceBoolean, Error> {
        let req = ApiRequest::post("dataclassifier/create")
            .json(classifier.to_payload(WriteIntent::Create)?);
        self.submit(&req, "create data classifier").await
    }

    /// `POST dataclassifier/edit`
    pub async fn edit_data_classifier(
        &self,
        classifier: &DataClassifier,
    ) -> Result<WebServiceBoolean, Error> {
        let req = ApiRequest::post("dataclassifier/edit")
            .json(classifier.to_payload(WriteIntent::Update)?);
        self.submit(&req, "edit data classifier").await
    }

    /// `POST dataclassifier/delete`
    pub async fn delete_data_classifier(
        &self,
        classifier: &DataClassifier,
    ) -> Result<WebServiceBoolean, Error> {
        let req = ApiRequest::post("dataclassifier/delete")
            .json(classifier.to_payload(WriteIntent::Delete)?);
        self.submit(&req, "delete data classifier").await
    }
}

// ── Classifier records ───────────────────────────────────────────────

impl AretasClient {
    /// `POST dataclassifierrecord/save`. The id is left out of the body.
    pub async fn save_classifier_record(
        &self,
        record: &DataClassifierRecord,
    ) -> Result<WebServiceBoolean, Error> {
        let req = ApiRequest::post("dataclassifierrecord/save")
            .json(record.to_payload(WriteIntent::Create)?);
        self.submit(&req, "save classifier record").await
    }

    /// `POST dataclassifierrecord/delete`
    pub async fn delete_classifier_record(
        &self,
        record: &DataClassifierRecord,
    ) -> Result<WebServiceBoolean, Error> {
        let req = ApiRequest::post("dataclassifierrecord/delete")
            .json(record.to_payload(WriteIntent::Delete)?);
        self.submit(&req, "delete classifier record").await
    }

    /// Delete every record attached to a classifier.
    ///
    /// `GET dataclassifierrecord/purge?dataClassifierId=`
    pub async fn purge_classifier_records(
        &self,
        data_classifier_id: &str,
    ) -> Result<WebServiceBoolean, Error> {
        let req = ApiRequest::get("dataclassifierrecord/purge")
            .query("dataClassifierId", data_classifier_id);
        self.submit(&req, "purge classifier records").await
    }

    /// `GET dataclassifierrecord/get/byid?dataClassifierId=`
    pub async fn classifier_records_by_id(
        &self,
        data_classifier_id: &str,
    ) -> Result<Option<Vec<DataClassifierRecord>>, Error> {
        let req = ApiRequest::get("dataclassifierrecord/get/byid")
            .query("dataClassifierId", data_classifier_id);
        self.fetch_list(&req).await
    }

    /// Records touching any of `macs` within `[start_ms, end_ms]`.
    ///
    /// `GET dataclassifierrecord/get/bymactimestamp?macs=&startTimeMs=&endTimeMs=&recordLimit=`
    pub async fn classifier_records_by_mac_timestamp(
        &self,
        macs: &[Mac],
        start_ms: i64,
        end_ms: i64,
        record_limit: Option<u64>,
    ) -> Result<Option<Vec<DataClassifierRecord>>, Error> {
        let req = ApiRequest::get("dataclassifierrecord/get/bymactimestamp")
            .query_pairs(macs.iter().map(|m| ("macs", m.to_string())).collect())
            .query("startTimeMs", start_ms)
            .query("endTimeMs", end_ms)
            .query("recordLimit", record_limit.unwrap_or(DEFAULT_RECORD_LIMIT));
        self.fetch_list(&req).await
    }
}
