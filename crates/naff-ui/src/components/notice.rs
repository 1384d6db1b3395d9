use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    fn class(self) -> &'static str {
        match self {
            NoticeLevel::Success => "toast toast-success",
            NoticeLevel::Error => "toast toast-error",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub level: NoticeLevel,
}

/// Transient messages shown in the corner of the screen, each dismissed after
/// a few seconds.
#[derive(Clone, Copy)]
pub struct NoticeContext {
    notices: RwSignal<Vec<Notice>>,
    next_id: StoredValue<u64>,
}

impl NoticeContext {
    pub fn push(&self, message: String, level: NoticeLevel) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        self.notices.update(|notices| {
            notices.push(Notice { id, message, level });
        });

        let notices = self.notices;
        set_timeout(
            move || notices.update(|n| n.retain(|notice| notice.id != id)),
            std::time::Duration::from_secs(5),
        );
    }
}

#[component]
pub fn NoticeProvider(children: Children) -> impl IntoView {
    let ctx = NoticeContext {
        notices: RwSignal::new(Vec::new()),
        next_id: StoredValue::new(0),
    };
    provide_context(ctx);

    view! {
        {children()}
        <div class="toast-container">
            <For each=move || ctx.notices.get() key=|notice| notice.id let:notice>
                <div class=notice.level.class()>{notice.message.clone()}</div>
            </For>
        </div>
    }
}
