//! Access log formatting module
//!
//! Formats one access log line per handled request. Supports the usual
//! nginx-style formats (combined, common, json) plus custom `$var` patterns.

use chrono::{DateTime, Local};

/// One handled request, accumulated by the router and formatted on write
#[derive(Debug)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub time: DateTime<Local>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 0,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            time: Local::now(),
            request_time_us: 0,
        }
    }

    /// Format this entry per the configured access log format.
    ///
    /// `combined` and `common` follow their Apache/nginx namesakes, `json`
    /// emits one object per line, anything else is treated as a custom
    /// `$var` pattern.
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            pattern => self.format_custom(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    fn time_local(&self) -> String {
        self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string()
    }

    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time_local(),
            self.request_line(),
            self.status,
            self.body_bytes
        )
    }

    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-")
        )
    }

    fn format_json(&self) -> String {
        format!(
            concat!(
                r#"{{"time":"{}","remote_addr":"{}","method":"{}","uri":"{}","#,
                r#""status":{},"body_bytes":{},"request_time_us":{}}}"#
            ),
            self.time.to_rfc3339(),
            escape_json(&self.remote_addr),
            escape_json(&self.method),
            escape_json(&self.request_uri()),
            self.status,
            self.body_bytes,
            self.request_time_us
        )
    }

    /// Supported variables: `$remote_addr`, `$time_local`, `$request`,
    /// `$request_method`, `$request_uri`, `$status`, `$body_bytes_sent`,
    /// `$http_referer`, `$http_user_agent`, `$request_time`.
    fn format_custom(&self, pattern: &str) -> String {
        let mut line = pattern.to_string();

        // Longer variable names first so $request does not eat $request_time
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;
        line = line.replace("$remote_addr", &self.remote_addr);
        line = line.replace("$time_local", &self.time_local());
        line = line.replace("$request_time", &format!("{request_time:.3}"));
        line = line.replace("$request_method", &self.method);
        line = line.replace("$request_uri", &self.request_uri());
        line = line.replace("$request", &self.request_line());
        line = line.replace("$status", &self.status.to_string());
        line = line.replace("$body_bytes_sent", &self.body_bytes.to_string());
        line = line.replace("$http_referer", self.referer.as_deref().unwrap_or("-"));
        line = line.replace(
            "$http_user_agent",
            self.user_agent.as_deref().unwrap_or("-"),
        );

        line
    }
}

/// Escape special characters for JSON string values
fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "127.0.0.1".to_string(),
            "POST".to_string(),
            "/api/reservations".to_string(),
        );
        entry.query = Some("courtType=Tennis".to_string());
        entry.status = 201;
        entry.body_bytes = 142;
        entry.user_agent = Some("Mozilla/5.0".to_string());
        entry.request_time_us = 2000;
        entry
    }

    #[test]
    fn test_format_combined() {
        let line = sample_entry().format("combined");
        assert!(line.contains("127.0.0.1"));
        assert!(line.contains("POST /api/reservations?courtType=Tennis HTTP/1.1"));
        assert!(line.contains("201 142"));
        assert!(line.contains("Mozilla/5.0"));
    }

    #[test]
    fn test_format_common_omits_agent() {
        let line = sample_entry().format("common");
        assert!(line.contains("201 142"));
        assert!(!line.contains("Mozilla/5.0"));
    }

    #[test]
    fn test_format_json() {
        let line = sample_entry().format("json");
        assert!(line.contains(r#""remote_addr":"127.0.0.1""#));
        assert!(line.contains(r#""status":201"#));
        assert!(line.contains(r#""uri":"/api/reservations?courtType=Tennis""#));
    }

    #[test]
    fn test_format_custom_pattern() {
        let line = sample_entry().format("$request_method $status $request_time");
        assert!(line.starts_with("POST 201 "));
        // 2000us formats as 0.002 seconds
        assert!(line.ends_with("0.002"), "unexpected line: {line}");
    }
}
