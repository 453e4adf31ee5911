//! InfluxDB 2.x store: line protocol writes and Flux latest-record queries

use std::collections::HashMap;

use anyhow::Result;
use reqwest::Client;

use avmet_core::{Report, ReportSink, WindDirection};

use crate::StoreError;

pub struct InfluxStore {
    client: Client,
    base_url: String,
    org: String,
    bucket: String,
    token: String,
}

impl InfluxStore {
    pub fn new(
        base_url: String,
        org: String,
        bucket: String,
        token: String,
    ) -> Result<Self, StoreError> {
        if base_url.is_empty() || org.is_empty() || bucket.is_empty() || token.is_empty() {
            return Err(StoreError::InvalidConfig);
        }
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url,
            org,
            bucket,
            token,
        })
    }

    fn to_line_protocol(&self, report: &Report) -> String {
        let mut fields: Vec<String> = Vec::new();
        fields.push(format!(
            "temperature={}i",
            report.temperatures.temperature
        ));
        fields.push(format!("dewpoint={}i", report.temperatures.dew_point));
        // variable winds carry no numeric direction
        if let WindDirection::Degrees(direction) = report.wind.direction {
            fields.push(format!("wind_direction={}i", direction));
        }
        if let Some(speed) = report.wind.speed {
            fields.push(format!("wind_speed={}i", speed));
        }
        if let Some(gust) = report.wind.gust {
            fields.push(format!("wind_gust={}i", gust));
        }
        fields.push(format!("visibility={}i", report.visibility));
        fields.push(format!("qnh={}i", report.qnh));
        if !report.present_weather.is_empty() {
            fields.push(format!(
                "weather=\"{}\"",
                report.present_weather.replace('"', "\\\"")
            ));
        }

        let timestamp = report
            .observation_time
            .timestamp_nanos_opt()
            .unwrap_or_default();
        format!(
            "metar,icao={} {} {}",
            report.station,
            fields.join(","),
            timestamp
        )
    }

    async fn write(&self, report: &Report) -> Result<(), StoreError> {
        let line = self.to_line_protocol(report);
        let url = format!(
            "{}/api/v2/write?org={}&bucket={}",
            self.base_url, self.org, self.bucket
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(line)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::WriteRejected { status, body });
        }
        tracing::debug!(station = %report.station, "wrote METAR point");
        Ok(())
    }

    /// Latest stored report for a station within the past 24 hours, as a
    /// field-to-value map. `None` when the station has no recent points.
    pub async fn latest(
        &self,
        station: &str,
    ) -> Result<Option<HashMap<String, serde_json::Value>>, StoreError> {
        let flux = format!(
            r#"from(bucket: "{}")
  |> range(start: -24h)
  |> filter(fn: (r) => r["_measurement"] == "metar")
  |> filter(fn: (r) => r["icao"] == "{}")
  |> last()"#,
            self.bucket, station
        );
        let url = format!("{}/api/v2/query?org={}", self.base_url, self.org);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/vnd.flux")
            .header("Accept", "application/csv")
            .body(flux)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::QueryRejected { status, body });
        }
        let body = resp.text().await?;
        Ok(fold_csv_fields(&body))
    }
}

#[async_trait::async_trait]
impl ReportSink for InfluxStore {
    async fn emit(&mut self, report: &Report) -> Result<()> {
        Ok(self.write(report).await?)
    }
}

/// Fold an annotated-CSV Flux response into a field-to-value map. Each
/// data row carries one `_field`/`_value` pair; an empty line ends a
/// table and the next header is re-read.
fn fold_csv_fields(csv: &str) -> Option<HashMap<String, serde_json::Value>> {
    let mut field_idx = None;
    let mut value_idx = None;
    let mut out = HashMap::new();

    for line in csv.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            field_idx = None;
            value_idx = None;
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        if field_idx.is_none() {
            field_idx = cells.iter().position(|cell| *cell == "_field");
            value_idx = cells.iter().position(|cell| *cell == "_value");
            continue;
        }
        if let (Some(field), Some(value)) = (field_idx, value_idx) {
            if let (Some(field), Some(value)) = (cells.get(field), cells.get(value)) {
                out.insert((*field).to_string(), parse_value(value));
            }
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn parse_value(raw: &str) -> serde_json::Value {
    if let Ok(int) = raw.parse::<i64>() {
        return serde_json::Value::from(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        return serde_json::Value::from(float);
    }
    serde_json::Value::from(raw)
}
