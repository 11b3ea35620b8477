use leptos::prelude::*;

#[component]
pub fn AdminPage() -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content text-center">
                <div class="card bg-base-100 shadow-xl max-w-xl">
                    <div class="card-body">
                        <h1 class="text-4xl font-bold text-primary">"Admin Dashboard"</h1>
                        <p class="text-base-content/70">
                            "Welcome to the admin panel. Manage your content and settings here."
                        </p>
                    </div>
                </div>
            </div>
        </div>
    }
}
