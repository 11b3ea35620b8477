//! 类型化的后端操作
//!
//! 页面组件只调用这里的方法。有先后依赖的调用（上传 -> 确认 -> 重新列出）
//! 按顺序执行，任一阶段失败即提前返回，错误的 trace 中标明失败的阶段。

use crate::error::{ApiError, ApiErrorKind, ApiResult};
use crate::gateway::{ApiGateway, AuthRecovery};
use crate::guard::post_login_target;
use crate::request::HttpClient;
use crate::session::StorageBackend;
use foldervault_shared::protocol::{
    ConfirmUploadRequest, CreateFolderRequest, DeleteFileRequest, ListFilesRequest,
    ListFoldersRequest, LoginRequest, LoginResponse, RegisterRequest, RenameFileRequest,
    UploadRequest,
};
use foldervault_shared::{DEFAULT_ROLE, Folder, StoredFile};

const LOGIN_FAILED: &str = "Login failed. Please try again.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";
const EMPTY_FOLDER_NAME: &str = "Please enter a folder name";
const UPLOAD_NOT_READY: &str = "Please select a file and ensure a folder is specified.";

/// 待上传的本地文件
#[derive(Debug, Clone)]
pub struct UploadSource {
    /// 本地文件名
    pub file_name: String,
    /// 用户在表单中改过的名字，空则使用本地文件名
    pub custom_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadSource {
    pub fn target_name(&self) -> &str {
        match self.custom_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.file_name,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// 选择文件后名称输入框的值：只在输入框为空时用文件名预填
    pub fn prefill_name(current: &str, selected_file: &str) -> String {
        if current.trim().is_empty() {
            selected_file.to_string()
        } else {
            current.to_string()
        }
    }
}

/// 登录成功的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub role: String,
    /// 登录后应跳转到的路径
    pub redirect_to: String,
}

#[derive(Clone)]
pub struct FolderVaultApi<C, B, R> {
    gateway: ApiGateway<C, B, R>,
}

impl<C, B, R> FolderVaultApi<C, B, R>
where
    C: HttpClient,
    B: StorageBackend,
    R: AuthRecovery,
{
    pub fn new(gateway: ApiGateway<C, B, R>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ApiGateway<C, B, R> {
        &self.gateway
    }

    // =========================================================
    // Auth
    // =========================================================

    /// 登录；凭据错误时返回后端消息，会话保持不变
    ///
    /// `origin` 是守卫重定向时保存的原始路径。
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        origin: Option<&str>,
    ) -> ApiResult<LoginOutcome> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let resp = self
            .gateway
            .send_anonymous(&request)
            .await
            .map_err(|e| match e.kind {
                ApiErrorKind::Network => ApiError::network(LOGIN_FAILED),
                _ => e,
            })
            .map_err(|e| e.in_op("auth.login"))?;

        if resp.status != 200 {
            let message = resp
                .error_message()
                .unwrap_or_else(|| LOGIN_FAILED.to_string());
            return Err(ApiError::rejected(resp.status, message).in_op("auth.login"));
        }

        let body: LoginResponse = resp.json().map_err(|e| e.in_op("auth.login"))?;
        let session = self.gateway.session();
        session.save(&body.token);
        session.save_role(&body.data.role);
        log::info!("[Auth] logged in with role {}", body.data.role);

        Ok(LoginOutcome {
            redirect_to: post_login_target(origin, &body.data.role),
            role: body.data.role,
        })
    }

    /// 自助注册，成功仅以 201 为准
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<()> {
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: DEFAULT_ROLE.to_string(),
        };

        let resp = self
            .gateway
            .send_anonymous(&request)
            .await
            .map_err(|_| ApiError::network(REGISTER_FAILED).in_op("auth.register"))?;

        if resp.status != 201 {
            return Err(ApiError::rejected(resp.status, REGISTER_FAILED).in_op("auth.register"));
        }
        Ok(())
    }

    /// 注销；存储删除失败时返回 `Storage` 错误
    pub fn logout(&self) -> ApiResult<()> {
        self.gateway
            .session()
            .clear()
            .map_err(|e| e.in_op("auth.logout"))?;
        log::info!("[Auth] logged out");
        Ok(())
    }

    // =========================================================
    // Folders
    // =========================================================

    pub async fn list_folders(&self) -> ApiResult<Vec<Folder>> {
        let listing = self
            .gateway
            .send(&ListFoldersRequest)
            .await
            .map_err(|e| e.in_op("folders.list"))?;
        Ok(listing.folders)
    }

    /// 创建文件夹并返回刷新后的列表
    pub async fn create_folder(&self, name: &str) -> ApiResult<Vec<Folder>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::invalid_input(EMPTY_FOLDER_NAME));
        }

        self.gateway
            .send(&CreateFolderRequest {
                folder_name: name.to_string(),
            })
            .await
            .map_err(|e| e.in_op_with("folders.create", name))?;

        self.list_folders().await
    }

    // =========================================================
    // Files
    // =========================================================

    pub async fn list_files(&self, folder: &str) -> ApiResult<Vec<StoredFile>> {
        let listing = self
            .gateway
            .send(&ListFilesRequest {
                folder: folder.to_string(),
            })
            .await
            .map_err(|e| e.in_op_with("files.list", folder))?;
        Ok(listing.files)
    }

    /// 打开文件夹视图：侧栏文件夹列表与文件列表并发获取，互不影响
    pub async fn open_folder(
        &self,
        folder: &str,
    ) -> (ApiResult<Vec<Folder>>, ApiResult<Vec<StoredFile>>) {
        futures::join!(self.list_folders(), self.list_files(folder))
    }

    /// 上传流水线：申请地址 -> 上传对象 -> 确认 -> 重新列出
    pub async fn upload_file(&self, folder: &str, source: UploadSource) -> ApiResult<Vec<StoredFile>> {
        if folder.trim().is_empty() || source.file_name.is_empty() {
            return Err(ApiError::invalid_input(UPLOAD_NOT_READY));
        }

        let ticket = self
            .gateway
            .send(&UploadRequest {
                name: format!("{}/{}", folder, source.target_name()),
                content_type: source.content_type.clone(),
                folder: folder.to_string(),
            })
            .await
            .map_err(|e| e.in_op("upload.request_url"))?;

        let size = source.size();
        self.gateway
            .put_object(&ticket.upload_url, &source.content_type, source.bytes)
            .await
            .map_err(|e| e.in_op("upload.put_object"))?;

        self.gateway
            .send(&ConfirmUploadRequest {
                key: ticket.key.clone(),
                size,
                file_type: source.content_type,
                folder: folder.to_string(),
            })
            .await
            .map_err(|e| e.in_op_with("upload.confirm", &ticket.key))?;

        log::info!("[Files] uploaded {}", ticket.key);
        self.list_files(folder)
            .await
            .map_err(|e| e.in_op("upload.relist"))
    }

    /// 删除文件并返回刷新后的列表
    pub async fn delete_file(&self, folder: &str, key: &str) -> ApiResult<Vec<StoredFile>> {
        self.gateway
            .send(&DeleteFileRequest {
                key: key.to_string(),
            })
            .await
            .map_err(|e| e.in_op_with("files.delete", key))?;

        self.list_files(folder).await
    }

    /// 重命名文件
    ///
    /// 新名字为空或与原名相同时不发请求，返回 `Ok(None)`。
    pub async fn rename_file(
        &self,
        folder: &str,
        file: &StoredFile,
        new_name: &str,
    ) -> ApiResult<Option<Vec<StoredFile>>> {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == file.name {
            return Ok(None);
        }

        self.gateway
            .send(&RenameFileRequest {
                old_key: file.key.clone(),
                new_name: new_name.to_string(),
            })
            .await
            .map_err(|e| e.in_op_with("files.rename", &file.key))?;

        self.list_files(folder).await.map(Some)
    }
}
