use crate::api::use_api;
use crate::components::icons::{FolderIcon, Plus};
use crate::components::toast::{Notifier, Toast};
use crate::web::router::use_router;
use foldervault::AppRoute;
use foldervault_shared::Folder;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 文件夹总览
#[component]
pub fn FoldersPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();
    let notifier = Notifier::new();

    let (folders, set_folders) = signal(Vec::<Folder>::new());
    let (is_loading, set_is_loading) = signal(true);
    let (show_modal, set_show_modal) = signal(false);
    let (new_folder, set_new_folder) = signal(String::new());

    // 首次加载
    {
        let api = api.clone();
        spawn_local(async move {
            match api.list_folders().await {
                Ok(list) => set_folders.set(list),
                Err(e) => {
                    log::error!("[Folders] {}", e);
                    if !e.is_session_invalid() {
                        notifier.error("Failed to load folders");
                    }
                }
            }
            set_is_loading.set(false);
        });
    }

    let on_create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = api.clone();
        let name = new_folder.get_untracked();

        spawn_local(async move {
            match api.create_folder(&name).await {
                Ok(list) => {
                    set_folders.set(list);
                    set_new_folder.set(String::new());
                    set_show_modal.set(false);
                    notifier.success("Folder created successfully!");
                }
                Err(e) => {
                    log::warn!("[Folders] {}", e);
                    notifier.error(e.message().to_string());
                }
            }
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 p-6">
            <Toast notifier=notifier />

            <div class="flex justify-between items-center mb-6">
                <h1 class="text-2xl font-bold">"All Folders"</h1>
                <button class="btn btn-primary gap-2" on:click=move |_| set_show_modal.set(true)>
                    <Plus attr:class="h-4 w-4" />
                    "New Folder"
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
                    when=move || !folders.with(|f| f.is_empty())
                    fallback=|| view! {
                        <p class="text-center text-base-content/60 py-20">"No folders yet"</p>
                    }
                >
                    <div class="grid grid-cols-2 md:grid-cols-4 lg:grid-cols-6 gap-4">
                        <For
                            each=move || folders.get()
                            key=|folder| folder.name.clone()
                            children=move |folder| {
                                let target = AppRoute::Folder(folder.name.clone()).to_path();
                                view! {
                                    <button
                                        class="card bg-base-100 shadow hover:shadow-lg transition-shadow"
                                        on:click=move |_| router.navigate(&target)
                                    >
                                        <div class="card-body items-center p-4">
                                            <FolderIcon attr:class="h-12 w-12 text-primary" />
                                            <span class="font-medium truncate w-full text-center">
                                                {folder.name.clone()}
                                            </span>
                                            <span class="text-xs text-base-content/60">
                                                {format!("{} items", folder.total_items)}
                                            </span>
                                        </div>
                                    </button>
                                }
                            }
                        />
                    </div>
                </Show>
            </Show>

            <Show when=move || show_modal.get()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg mb-4">"Create New Folder"</h3>
                        <form on:submit=on_create.clone()>
                            <input
                                type="text"
                                placeholder="Folder name"
                                class="input input-bordered w-full"
                                prop:value=new_folder
                                on:input=move |ev| set_new_folder.set(event_target_value(&ev))
                            />
                            <div class="modal-action">
                                <button
                                    type="button"
                                    class="btn btn-ghost"
                                    on:click=move |_| set_show_modal.set(false)
                                >
                                    "Cancel"
                                </button>
                                <button type="submit" class="btn btn-primary">"Create"</button>
                            </div>
                        </form>
                    </div>
                </div>
            </Show>
        </div>
    }
}
