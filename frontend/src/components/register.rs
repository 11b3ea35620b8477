use crate::api::use_api;
use crate::web::router::{Link, use_router};
use foldervault::route::LOGIN_PATH;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);
        set_is_submitting.set(true);

        let api = api.clone();
        let (name, email, password) = (
            name.get_untracked(),
            email.get_untracked(),
            password.get_untracked(),
        );

        spawn_local(async move {
            match api.register(&name, &email, &password).await {
                Ok(()) => {
                    log::info!("[Register] account created for {}", email);
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message("Registration successful!");
                    }
                    router.navigate(LOGIN_PATH);
                }
                Err(e) => set_error_msg.set(Some(e.message().to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-neutral">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold text-neutral-content">"Create Account"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>
                        <input
                            type="text"
                            placeholder="Name"
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                            prop:value=name
                            class="input input-bordered"
                            required
                        />
                        <input
                            type="email"
                            placeholder="Email"
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            prop:value=email
                            class="input input-bordered"
                            required
                        />
                        <input
                            type="password"
                            placeholder="Password"
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            prop:value=password
                            class="input input-bordered"
                            required
                        />
                        <button class="btn btn-primary mt-4" disabled=move || is_submitting.get()>
                            "Register"
                        </button>
                        <p class="text-sm text-center">
                            "Already registered? "
                            <Link to=LOGIN_PATH class="link link-primary">"Login"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
