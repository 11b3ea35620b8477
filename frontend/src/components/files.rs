//! 单个文件夹的文件视图
//!
//! 侧栏列出所有文件夹，主区域是文件网格，另有上传、重命名、大图预览三个弹窗。
//! 异步请求返回时若用户已切换到别的文件夹，结果直接丢弃。

use crate::api::use_api;
use crate::components::icons::{FileIcon, FolderIcon, Pencil, Plus, Trash2};
use crate::components::toast::{Notifier, Toast};
use crate::web::router::{RouterService, use_router};
use foldervault::{ApiResult, AppRoute, UploadSource};
use foldervault_shared::{Folder, StoredFile};
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen_futures::JsFuture;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

fn still_viewing(router: RouterService, folder: &str) -> bool {
    router
        .current_route()
        .with_untracked(|r| matches!(r, AppRoute::Folder(f) if f == folder))
}

/// 写回刷新后的文件列表并提示
fn settle(
    router: RouterService,
    folder: &str,
    set_files: WriteSignal<Vec<StoredFile>>,
    notifier: Notifier,
    result: ApiResult<Vec<StoredFile>>,
    success: &str,
) -> bool {
    if !still_viewing(router, folder) {
        log::debug!("[Files] dropping stale response for {}", folder);
        return false;
    }
    match result {
        Ok(files) => {
            set_files.set(files);
            notifier.success(success);
            true
        }
        Err(e) => {
            log::warn!("[Files] {}", e);
            notifier.error(e.message().to_string());
            false
        }
    }
}

async fn read_bytes(file: &web_sys::File) -> Option<Vec<u8>> {
    let buffer = JsFuture::from(file.array_buffer()).await.ok()?;
    Some(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// 从文件选择框构造上传源；未选择文件时返回空源，由上传校验拒绝
async fn collect_source(input: Option<web_sys::HtmlInputElement>, custom_name: String) -> UploadSource {
    let file = input.and_then(|el| el.files()).and_then(|list| list.get(0));
    let Some(file) = file else {
        return UploadSource {
            file_name: String::new(),
            custom_name: None,
            content_type: FALLBACK_CONTENT_TYPE.to_string(),
            bytes: Vec::new(),
        };
    };

    let content_type = match file.type_() {
        t if t.is_empty() => FALLBACK_CONTENT_TYPE.to_string(),
        t => t,
    };
    UploadSource {
        file_name: file.name(),
        custom_name: Some(custom_name),
        content_type,
        bytes: read_bytes(&file).await.unwrap_or_default(),
    }
}

#[component]
pub fn FilesPage(folder: String) -> impl IntoView {
    let api = use_api();
    let router = use_router();
    let notifier = Notifier::new();

    let (folders, set_folders) = signal(Vec::<Folder>::new());
    let (files, set_files) = signal(Vec::<StoredFile>::new());
    let (is_loading, set_is_loading) = signal(true);

    let (show_upload, set_show_upload) = signal(false);
    let (upload_name, set_upload_name) = signal(String::new());
    let (upload_error, set_upload_error) = signal(Option::<String>::None);
    let (is_uploading, set_is_uploading) = signal(false);
    let file_input = NodeRef::<Input>::new();

    let (rename_target, set_rename_target) = signal(Option::<StoredFile>::None);
    let (rename_value, set_rename_value) = signal(String::new());
    let (preview, set_preview) = signal(Option::<StoredFile>::None);

    // 侧栏与文件列表并发加载
    {
        let api = api.clone();
        let folder = folder.clone();
        spawn_local(async move {
            let (sidebar, listing) = api.open_folder(&folder).await;
            if !still_viewing(router, &folder) {
                return;
            }
            match sidebar {
                Ok(list) => set_folders.set(list),
                Err(e) => log::warn!("[Files] sidebar: {}", e),
            }
            match listing {
                Ok(list) => set_files.set(list),
                Err(e) => {
                    log::error!("[Files] {}", e);
                    if !e.is_session_invalid() {
                        notifier.error("Failed to load files");
                    }
                }
            }
            set_is_loading.set(false);
        });
    }

    let on_file_selected = move |_| {
        let selected = file_input
            .get_untracked()
            .and_then(|el| el.files())
            .and_then(|list| list.get(0));
        if let Some(file) = selected {
            let name = UploadSource::prefill_name(&upload_name.get_untracked(), &file.name());
            set_upload_name.set(name);
        }
        set_upload_error.set(None);
    };

    let on_upload = {
        let api = api.clone();
        let folder = folder.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            set_upload_error.set(None);
            set_is_uploading.set(true);

            let api = api.clone();
            let folder = folder.clone();
            let input = file_input.get_untracked();
            let custom_name = upload_name.get_untracked();

            spawn_local(async move {
                let source = collect_source(input, custom_name).await;
                match api.upload_file(&folder, source).await {
                    Ok(list) => {
                        if still_viewing(router, &folder) {
                            set_files.set(list);
                            set_show_upload.set(false);
                            set_upload_name.set(String::new());
                            notifier.success("File uploaded successfully!");
                        }
                    }
                    Err(e) => {
                        log::warn!("[Files] {}", e);
                        set_upload_error.set(Some(e.message().to_string()));
                    }
                }
                set_is_uploading.set(false);
            });
        }
    };

    let on_rename = {
        let api = api.clone();
        let folder = folder.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(file) = rename_target.get_untracked() else {
                return;
            };
            let api = api.clone();
            let folder = folder.clone();
            let new_name = rename_value.get_untracked();

            spawn_local(async move {
                match api.rename_file(&folder, &file, &new_name).await {
                    Ok(None) => set_rename_target.set(None),
                    Ok(Some(list)) => {
                        if settle(router, &folder, set_files, notifier, Ok(list), "File renamed successfully!") {
                            set_rename_target.set(None);
                        }
                    }
                    Err(e) => {
                        settle(router, &folder, set_files, notifier, Err(e), "");
                    }
                }
            });
        }
    };

    let sidebar_folder = folder.clone();
    let file_card = {
        let api = api.clone();
        let folder = folder.clone();
        move |file: StoredFile| {
            let on_delete = {
                let api = api.clone();
                let folder = folder.clone();
                let file = file.clone();
                move |ev: web_sys::MouseEvent| {
                    ev.stop_propagation();
                    let question = format!("Are you sure you want to delete {}?", file.display_name());
                    let confirmed = web_sys::window()
                        .and_then(|w| w.confirm_with_message(&question).ok())
                        .unwrap_or(false);
                    if !confirmed {
                        return;
                    }
                    let api = api.clone();
                    let folder = folder.clone();
                    let key = file.key.clone();
                    spawn_local(async move {
                        let result = api.delete_file(&folder, &key).await;
                        settle(router, &folder, set_files, notifier, result, "File deleted successfully!");
                    });
                }
            };
            let on_edit = {
                let file = file.clone();
                move |ev: web_sys::MouseEvent| {
                    ev.stop_propagation();
                    set_rename_value.set(file.name.clone());
                    set_rename_target.set(Some(file.clone()));
                }
            };
            let on_open = {
                let file = file.clone();
                move |_| set_preview.set(Some(file.clone()))
            };

            let thumb = if file.is_image() {
                view! { <img src=file.url.clone() alt=file.name.clone() class="h-32 w-full object-cover rounded" /> }
                    .into_any()
            } else {
                view! { <FileIcon attr:class="h-16 w-16 text-base-content/50" /> }.into_any()
            };

            view! {
                <div class="card bg-base-100 shadow cursor-pointer" on:click=on_open>
                    <figure class="p-2 h-36 flex items-center justify-center">{thumb}</figure>
                    <div class="card-body p-3">
                        <p class="text-sm font-medium truncate" title=file.name.clone()>
                            {file.display_name().to_string()}
                        </p>
                        <div class="card-actions justify-end">
                            <button class="btn btn-ghost btn-xs" on:click=on_edit>
                                <Pencil attr:class="h-4 w-4" />
                            </button>
                            <button class="btn btn-ghost btn-xs text-error" on:click=on_delete>
                                <Trash2 attr:class="h-4 w-4" />
                            </button>
                        </div>
                    </div>
                </div>
            }
        }
    };
    let file_card = StoredValue::new_local(file_card);

    view! {
        <div class="flex min-h-screen bg-base-200">
            <Toast notifier=notifier />

            <aside class="w-56 bg-base-100 p-4 hidden md:block">
                <h2 class="font-semibold mb-3">"Folders"</h2>
                <ul class="menu p-0">
                    <For
                        each=move || folders.get()
                        key=|f| f.name.clone()
                        children=move |f| {
                            let active = f.name == sidebar_folder;
                            let target = AppRoute::Folder(f.name.clone()).to_path();
                            view! {
                                <li>
                                    <a
                                        class=if active { "active" } else { "" }
                                        on:click=move |_| router.navigate(&target)
                                    >
                                        <FolderIcon attr:class="h-4 w-4" />
                                        {f.name.clone()}
                                    </a>
                                </li>
                            }
                        }
                    />
                </ul>
            </aside>

            <main class="flex-1 p-6">
                <div class="flex justify-between items-center mb-6">
                    <h1 class="text-2xl font-bold">{folder.clone()}</h1>
                    <button class="btn btn-primary gap-2" on:click=move |_| set_show_upload.set(true)>
                        <Plus attr:class="h-4 w-4" />
                        "Upload File"
                    </button>
                </div>

                <Show
                    when=move || !is_loading.get()
                    fallback=|| view! {
                        <div class="flex justify-center py-20">
                            <span class="loading loading-spinner loading-lg"></span>
                        </div>
                    }
                >
                    <Show
                        when=move || !files.with(|f| f.is_empty())
                        fallback=|| view! {
                            <p class="text-center text-base-content/60 py-20">"This folder is empty"</p>
                        }
                    >
                        <div class="grid grid-cols-2 md:grid-cols-3 lg:grid-cols-5 gap-4">
                            <For
                                each=move || files.get()
                                key=|f| f.key.clone()
                                children=file_card.get_value()
                            />
                        </div>
                    </Show>
                </Show>
            </main>

            <Show when=move || show_upload.get()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg mb-4">"Upload File"</h3>
                        <form on:submit=on_upload.clone() class="flex flex-col gap-3">
                            <input
                                type="file"
                                node_ref=file_input
                                class="file-input file-input-bordered w-full"
                                on:change=on_file_selected
                            />
                            <input
                                type="text"
                                placeholder="File name"
                                class="input input-bordered w-full"
                                prop:value=upload_name
                                on:input=move |ev| set_upload_name.set(event_target_value(&ev))
                            />
                            <Show when=move || upload_error.get().is_some()>
                                <p class="text-error text-sm">{move || upload_error.get().unwrap_or_default()}</p>
                            </Show>
                            <div class="modal-action">
                                <button
                                    type="button"
                                    class="btn btn-ghost"
                                    on:click=move |_| {
                                        set_show_upload.set(false);
                                        set_upload_error.set(None);
                                    }
                                >
                                    "Cancel"
                                </button>
                                <button type="submit" class="btn btn-primary" disabled=move || is_uploading.get()>
                                    {move || if is_uploading.get() { "Uploading..." } else { "Upload" }}
                                </button>
                            </div>
                        </form>
                    </div>
                </div>
            </Show>

            <Show when=move || rename_target.with(|t| t.is_some())>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg mb-4">"Rename File"</h3>
                        <form on:submit=on_rename.clone()>
                            <input
                                type="text"
                                class="input input-bordered w-full"
                                prop:value=rename_value
                                on:input=move |ev| set_rename_value.set(event_target_value(&ev))
                            />
                            <div class="modal-action">
                                <button type="button" class="btn btn-ghost" on:click=move |_| set_rename_target.set(None)>
                                    "Cancel"
                                </button>
                                <button type="submit" class="btn btn-primary">"Save"</button>
                            </div>
                        </form>
                    </div>
                </div>
            </Show>

            <Show when=move || preview.with(|p| p.is_some())>
                <div class="modal modal-open" on:click=move |_| set_preview.set(None)>
                    <div class="modal-box max-w-4xl">
                        {move || preview.get().map(|file| {
                            let body = if file.is_image() {
                                view! { <img src=file.url.clone() alt=file.name.clone() class="w-full rounded" /> }
                                    .into_any()
                            } else {
                                view! {
                                    <a href=file.url.clone() target="_blank" class="link link-primary">
                                        "Open file"
                                    </a>
                                }
                                .into_any()
                            };
                            view! {
                                <h3 class="font-bold text-lg mb-4">{file.display_name().to_string()}</h3>
                                {body}
                            }
                        })}
                    </div>
                </div>
            </Show>
        </div>
    }
}
