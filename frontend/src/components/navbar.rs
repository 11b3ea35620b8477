use crate::api::use_api;
use crate::auth::{logout, use_auth};
use crate::components::icons::{FolderIcon, LogOut};
use crate::web::router::{Link, use_router};
use foldervault::route::{ADMIN_PATH, ALL_FOLDERS_PATH, LOGIN_PATH};
use foldervault_shared::ADMIN_ROLE;
use leptos::prelude::*;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let is_admin = move || auth.session.with(|s| s.role() == ADMIN_ROLE);

    let on_logout = move |_| {
        logout(auth, &api);
        router.navigate(LOGIN_PATH);
    };

    view! {
        <div class="navbar bg-neutral text-neutral-content shadow-xl">
            <div class="flex-1 gap-2">
                <FolderIcon attr:class="h-6 w-6 text-primary" />
                <Link to=ALL_FOLDERS_PATH class="btn btn-ghost text-xl">
                    "DEZIGN SHARK"
                </Link>
            </div>
            <div class="flex-none gap-2">
                <Show when=is_admin>
                    <Link to=ADMIN_PATH class="btn btn-ghost btn-sm">"Admin"</Link>
                </Show>
                <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                    <LogOut attr:class="h-4 w-4" /> "Logout"
                </button>
            </div>
        </div>
    }
}
