use leptos::prelude::*;
use std::time::Duration;

const DISPLAY_FOR: Duration = Duration::from_secs(3);

/// 页面内通知：(消息内容, 是否出错)，3 秒后自动清除
///
/// 新消息会取消上一条的清除定时器。
#[derive(Clone, Copy)]
pub struct Notifier {
    notification: ReadSignal<Option<(String, bool)>>,
    set_notification: WriteSignal<Option<(String, bool)>>,
    timer: StoredValue<Option<TimeoutHandle>>,
}

impl Notifier {
    pub fn new() -> Self {
        let (notification, set_notification) = signal(Option::<(String, bool)>::None);
        let timer = StoredValue::<Option<TimeoutHandle>>::new(None);

        on_cleanup(move || {
            if let Some(handle) = timer.try_get_value().flatten() {
                handle.clear();
            }
        });

        Self {
            notification,
            set_notification,
            timer,
        }
    }

    fn show(&self, message: String, is_error: bool) {
        if let Some(handle) = self.timer.get_value() {
            handle.clear();
        }
        self.set_notification.set(Some((message, is_error)));

        let set_notification = self.set_notification;
        let handle = set_timeout_with_handle(move || set_notification.set(None), DISPLAY_FOR)
            .map_err(|e| log::warn!("[Toast] failed to schedule clear: {:?}", e))
            .ok();
        self.timer.set_value(handle);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message.into(), false);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message.into(), true);
    }
}

#[component]
pub fn Toast(notifier: Notifier) -> impl IntoView {
    let notification = notifier.notification;

    view! {
        <Show when=move || notification.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    let is_err = notification.get().map(|(_, e)| e).unwrap_or(false);
                    if is_err { "alert alert-error shadow-lg" } else { "alert alert-success shadow-lg" }
                }>
                    <span>{move || notification.get().map(|(m, _)| m).unwrap_or_default()}</span>
                </div>
            </div>
        </Show>
    }
}
