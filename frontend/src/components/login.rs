use crate::api::use_api;
use crate::auth::{login, use_auth};
use crate::components::icons::{Eye, EyeOff, FolderIcon};
use crate::web::router::{Link, current_origin, use_router};
use foldervault::route::REGISTER_PATH;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (show_password, set_show_password) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);
        set_is_submitting.set(true);

        let api = api.clone();
        let email = email.get_untracked();
        let password = password.get_untracked();
        let origin = current_origin();

        spawn_local(async move {
            match login(auth, &api, email, password, origin).await {
                Ok(outcome) => router.navigate(&outcome.redirect_to),
                Err(e) => {
                    log::warn!("[Login] {}", e);
                    set_error_msg.set(Some(e.message().to_string()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-neutral">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <FolderIcon attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold text-neutral-content">"DEZIGN SHARK"</h1>
                        <p class="text-neutral-content/70 tracking-widest">"ALL ABOUT DESIGN"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <h2 class="text-xl font-semibold">"Welcome Back"</h2>
                        <p class="text-sm text-base-content/60">"Please enter your login details to continue"</p>

                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| {
                                    set_email.set(event_target_value(&ev));
                                    set_error_msg.set(None);
                                }
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <div class="join w-full">
                                <input
                                    id="password"
                                    type=move || if show_password.get() { "text" } else { "password" }
                                    on:input=move |ev| {
                                        set_password.set(event_target_value(&ev));
                                        set_error_msg.set(None);
                                    }
                                    prop:value=password
                                    class="input input-bordered join-item w-full"
                                    required
                                />
                                <button
                                    type="button"
                                    class="btn join-item"
                                    on:click=move |_| set_show_password.update(|v| *v = !*v)
                                >
                                    {move || if show_password.get() {
                                        view! { <EyeOff attr:class="h-4 w-4" /> }.into_any()
                                    } else {
                                        view! { <Eye attr:class="h-4 w-4" /> }.into_any()
                                    }}
                                </button>
                            </div>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Login".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center">
                            "Don't have an account? "
                            <Link to=REGISTER_PATH class="link link-primary">"Register"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
