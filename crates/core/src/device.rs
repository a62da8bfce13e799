//! Device identification headers

use sha2::{Digest, Sha256};

/// デバイス情報
///
/// User-Agent と X-Device-Fingerprint ヘッダーの材料。モバイル側では
/// 端末情報で上書きし、それ以外では実行環境から検出した値を使う。
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub app_name: String,
    pub app_version: String,
    pub platform: String,
    pub os_version: String,
    pub manufacturer: String,
    pub model: String,
}

impl DeviceInfo {
    /// 実行環境からデバイス情報を検出
    pub fn detect(app_name: &str, app_version: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            app_version: app_version.to_string(),
            platform: std::env::consts::OS.to_string(),
            os_version: "unknown".to_string(),
            manufacturer: "generic".to_string(),
            model: std::env::consts::ARCH.to_string(),
        }
    }

    /// プラットフォーム名を設定
    pub fn with_platform(mut self, value: &str) -> Self {
        self.platform = value.to_string();
        self
    }

    /// OS バージョンを設定
    pub fn with_os_version(mut self, value: &str) -> Self {
        self.os_version = value.to_string();
        self
    }

    /// 製造元を設定
    pub fn with_manufacturer(mut self, value: &str) -> Self {
        self.manufacturer = value.to_string();
        self
    }

    /// 機種名を設定
    pub fn with_model(mut self, value: &str) -> Self {
        self.model = value.to_string();
        self
    }

    /// デバイスフィンガープリントを生成
    ///
    /// デバイス特性を連結した文字列の SHA-256 ダイジェストの先頭 16 文字
    /// （16進小文字）。
    pub fn fingerprint(&self) -> String {
        let data = format!(
            "{}_{}_{}_{}",
            self.platform, self.manufacturer, self.model, self.os_version
        );
        let digest = Sha256::digest(data.as_bytes());
        hex::encode(digest)[..16].to_string()
    }

    /// User-Agent 文字列を生成
    pub fn user_agent(&self) -> String {
        format!(
            "{}/{} ({} {}; {} {})",
            self.app_name,
            self.app_version,
            self.platform,
            self.os_version,
            self.manufacturer,
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DeviceInfo {
        DeviceInfo::detect("marlin", "1.0.0")
            .with_platform("android")
            .with_os_version("14")
            .with_manufacturer("samsung")
            .with_model("sm-s921b")
    }

    #[test]
    fn fingerprint_is_16_hex_chars() {
        let fp = device().fingerprint();
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(device().fingerprint(), device().fingerprint());
    }

    #[test]
    fn fingerprint_changes_with_model() {
        let other = device().with_model("pixel-8");
        assert_ne!(device().fingerprint(), other.fingerprint());
    }

    #[test]
    fn user_agent_contains_app_and_device() {
        let ua = device().user_agent();
        assert_eq!(ua, "marlin/1.0.0 (android 14; samsung sm-s921b)");
    }
}
