use crate::{Acknowledgement, FileListing, FolderListing, UserData};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::borrow::Cow;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path, relative to the API base URL.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// 实际请求路径。带路径参数的请求覆盖此方法。
    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed(Self::PATH)
    }

    /// GET 请求不携带 body
    fn has_body(&self) -> bool {
        Self::METHOD != HttpMethod::Get
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `{ token, data: { role, ... } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub data: UserData,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// 自助注册总是以默认角色创建
    pub role: String,
}

impl ApiRequest for RegisterRequest {
    type Response = Acknowledgement;
    const PATH: &'static str = "/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// Folders
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFoldersRequest;

impl ApiRequest for ListFoldersRequest {
    type Response = FolderListing;
    const PATH: &'static str = "/folders/list-folders";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub folder_name: String,
}

impl ApiRequest for CreateFolderRequest {
    type Response = Acknowledgement;
    const PATH: &'static str = "/folders/create-folder";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// Files
// =========================================================

/// List files of a folder: `GET /files/:folder`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFilesRequest {
    #[serde(skip)]
    pub folder: String,
}

impl ApiRequest for ListFilesRequest {
    type Response = FileListing;
    const PATH: &'static str = "/files";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> Cow<'_, str> {
        Cow::Owned(format!(
            "{}/{}",
            Self::PATH,
            urlencoding::encode(&self.folder)
        ))
    }
}

/// 申请预签名上传地址
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// `folder/file_name`
    pub name: String,
    pub content_type: String,
    pub folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    pub upload_url: String,
    pub key: String,
}

impl ApiRequest for UploadRequest {
    type Response = UploadTicket;
    const PATH: &'static str = "/files/upload";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmUploadRequest {
    pub key: String,
    pub size: u64,
    pub file_type: String,
    pub folder: String,
}

impl ApiRequest for ConfirmUploadRequest {
    type Response = Acknowledgement;
    const PATH: &'static str = "/files/confirm-upload";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteFileRequest {
    pub key: String,
}

impl ApiRequest for DeleteFileRequest {
    type Response = Acknowledgement;
    const PATH: &'static str = "/files/delete";
    const METHOD: HttpMethod = HttpMethod::Delete;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFileRequest {
    pub old_key: String,
    pub new_name: String,
}

impl ApiRequest for RenameFileRequest {
    type Response = Acknowledgement;
    const PATH: &'static str = "/files/rename";
    const METHOD: HttpMethod = HttpMethod::Put;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_files_path_encodes_folder() {
        let req = ListFilesRequest {
            folder: "brand assets".into(),
        };
        assert_eq!(req.path(), "/files/brand%20assets");
        assert!(!req.has_body());
    }

    #[test]
    fn test_write_requests_use_camel_case() {
        let body = serde_json::to_value(RenameFileRequest {
            old_key: "a/b.png".into(),
            new_name: "c.png".into(),
        })
        .unwrap();
        assert_eq!(body["oldKey"], "a/b.png");
        assert_eq!(body["newName"], "c.png");

        let body = serde_json::to_value(CreateFolderRequest {
            folder_name: "logos".into(),
        })
        .unwrap();
        assert_eq!(body["folderName"], "logos");
    }

    #[test]
    fn test_upload_ticket_decodes() {
        let ticket: UploadTicket =
            serde_json::from_str(r#"{"uploadUrl":"https://s3/x?sig=1","key":"f/a.png"}"#).unwrap();
        assert_eq!(ticket.key, "f/a.png");
        assert!(DeleteFileRequest { key: ticket.key }.has_body());
    }
}
