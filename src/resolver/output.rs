// src/resolver/output.rs - Output sheet row for one resolved record

use serde::Serialize;

use super::Resolution;
use crate::models::core::InputRecord;

/// One output row. Column names follow the result sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub nama_gmaps: String,
    pub alamat_gmaps: String,
    pub nomor_telepon: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub keterangan: Option<String>,
    pub score_match: Option<f64>,
    pub status_bisnis: String,
    pub status_kode: i32,
    pub status_tutup: Option<String>,
    pub latlong_status: &'static str,
    pub gcs_result: i32,
    pub latitude_gc: Option<f64>,
    pub longitude_gc: Option<f64>,
    pub latlong_status_gc: &'static str,
    pub nama_usaha_gc: String,
    pub alamat_usaha_gc: String,
    pub hasilgc: i32,
}

impl OutputRow {
    /// `record` is the raw input record; its name and address are echoed back.
    pub fn from_resolution(record: &InputRecord, resolution: &Resolution) -> Self {
        let outcome = &resolution.outcome;
        let code = outcome.status_code.code();
        let coordinates = if outcome.status_code.keeps_coordinates() {
            outcome.coordinates
        } else {
            None
        };
        let latitude = coordinates.map(|c| c.latitude);
        let longitude = coordinates.map(|c| c.longitude);
        let latlong_status = if coordinates.is_some() { "valid" } else { "invalid" };

        Self {
            nama_gmaps: resolution.name.clone(),
            alamat_gmaps: resolution.address.clone(),
            nomor_telepon: resolution.phone.clone().unwrap_or_default(),
            latitude,
            longitude,
            keterangan: resolution.remark.clone(),
            score_match: resolution.score,
            status_bisnis: outcome.status_label.clone(),
            status_kode: code,
            status_tutup: outcome.closed_label.clone(),
            latlong_status,
            gcs_result: code,
            latitude_gc: latitude,
            longitude_gc: longitude,
            latlong_status_gc: latlong_status,
            nama_usaha_gc: record.name.clone(),
            alamat_usaha_gc: record.address.clone(),
            hasilgc: code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::{Coordinates, DecisionBranch, Outcome, StatusCode};
    use crate::resolver::Disposition;

    fn resolution(status_code: StatusCode, coordinates: Option<Coordinates>) -> Resolution {
        Resolution {
            disposition: Disposition::Resolved,
            outcome: Outcome {
                status_code,
                status_label: "Ditemukan (score=0.90)".to_string(),
                closed_label: None,
                coordinates,
                branch: DecisionBranch::AddressConfirmed,
            },
            name: "Toko Maju Jaya".to_string(),
            address: "Jl. Imam Bonjol No. 10".to_string(),
            phone: None,
            score: Some(0.9),
            source: Some("direct/place".to_string()),
            remark: None,
            queries_tried: 1,
            lookups_failed: 0,
        }
    }

    #[test]
    fn test_found_row_mirrors_coordinates() {
        let record = InputRecord::new("TOKO MAJU JAYA", "jl imam bonjol 10", "");
        let row = OutputRow::from_resolution(
            &record,
            &resolution(StatusCode::Found, Some(Coordinates::new(-8.65, 115.21))),
        );
        assert_eq!(row.status_kode, 1);
        assert_eq!((row.gcs_result, row.hasilgc), (1, 1));
        assert_eq!(row.latitude, Some(-8.65));
        assert_eq!(row.longitude_gc, Some(115.21));
        assert_eq!(row.latlong_status, "valid");
        assert_eq!(row.latlong_status_gc, "valid");
        assert_eq!(row.nomor_telepon, "");
        assert_eq!(row.nama_usaha_gc, "TOKO MAJU JAYA");
        assert_eq!(row.alamat_usaha_gc, "jl imam bonjol 10");
    }

    #[test]
    fn test_not_found_row_never_has_coordinates() {
        let record = InputRecord::new("Toko Maju Jaya", "", "");
        let row = OutputRow::from_resolution(
            &record,
            &resolution(StatusCode::NotFound, Some(Coordinates::new(-8.65, 115.21))),
        );
        assert_eq!(row.status_kode, 99);
        assert_eq!(row.latitude, None);
        assert_eq!(row.longitude, None);
        assert_eq!(row.latitude_gc, None);
        assert_eq!(row.latlong_status, "invalid");
    }

    #[test]
    fn test_row_serializes_sheet_columns() {
        let record = InputRecord::new("Toko Maju Jaya", "", "");
        let row = OutputRow::from_resolution(&record, &Resolution::skipped());
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["status_kode"], 99);
        assert_eq!(json["keterangan"], "Skip: nama_usaha kosong");
        assert!(json["score_match"].is_null());
        assert!(json["latitude"].is_null());
        assert_eq!(json["status_bisnis"], "Tidak ditemukan");
    }
}
