use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const STORAGE_TOKEN_KEY: &str = "token";
pub const STORAGE_ROLE_KEY: &str = "role";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// 未存储角色（或未登录）时使用的默认角色
pub const DEFAULT_ROLE: &str = "User";
pub const ADMIN_ROLE: &str = "Admin";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub name: String,
    #[serde(default)]
    pub total_items: u64,
}

/// 对象存储中的文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub name: String,
    /// 完整存储 key，形如 `folder/file.png`
    pub key: String,
    #[serde(default)]
    pub size: u64,
    /// 预览/下载地址
    #[serde(default)]
    pub url: String,
}

impl StoredFile {
    /// 是否可以作为图片预览
    pub fn is_image(&self) -> bool {
        let lower = self.name.to_ascii_lowercase();
        [".jpg", ".jpeg", ".png", ".gif"]
            .iter()
            .any(|ext| lower.ends_with(ext))
    }

    /// key 的最后一段，用于确认对话框等展示场景
    pub fn display_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderListing {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListing {
    #[serde(default)]
    pub files: Vec<StoredFile>,
}

/// 后端对写操作的通用应答，字段均可缺省
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Acknowledgement {
    pub message: Option<String>,
}

/// 登录成功后返回的用户信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub role: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, key: &str) -> StoredFile {
        StoredFile {
            name: name.into(),
            key: key.into(),
            size: 0,
            url: String::new(),
        }
    }

    #[test]
    fn test_is_image_case_insensitive() {
        assert!(file("cat.PNG", "a/cat.PNG").is_image());
        assert!(file("cat.jpeg", "a/cat.jpeg").is_image());
        assert!(!file("notes.pdf", "a/notes.pdf").is_image());
        assert!(!file("png", "a/png").is_image());
    }

    #[test]
    fn test_display_name_uses_last_key_segment() {
        assert_eq!(file("x", "designs/2024/logo.svg").display_name(), "logo.svg");
        assert_eq!(file("x", "flat.txt").display_name(), "flat.txt");
    }

    #[test]
    fn test_listings_tolerate_missing_arrays() {
        let folders: FolderListing = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert!(folders.folders.is_empty());
        assert_eq!(folders.message, "ok");

        let files: FileListing = serde_json::from_str("{}").unwrap();
        assert!(files.files.is_empty());
    }

    #[test]
    fn test_file_entry_without_url_still_decodes() {
        let files: FileListing = serde_json::from_str(
            r#"{"files":[{"name":"a.png","key":"f/a.png"},{"name":"b.png","key":"f/b.png","size":2,"url":"https://cdn/b.png"}]}"#,
        )
        .unwrap();
        assert_eq!(files.files.len(), 2);
        assert_eq!(files.files[0].url, "");
        assert_eq!(files.files[1].url, "https://cdn/b.png");
    }

    #[test]
    fn test_folder_uses_camel_case_on_the_wire() {
        let folder: Folder = serde_json::from_str(r#"{"name":"logos","totalItems":3}"#).unwrap();
        assert_eq!(folder.total_items, 3);
    }
}
