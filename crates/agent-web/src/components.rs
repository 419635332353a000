//! UI Components

use leptos::prelude::*;

use agent_core::{session::SessionStats, ChatSession, Message, Role};

/// Message bubble component
#[component]
pub fn MessageBubble(message: Message) -> impl IntoView {
    let (label, class) = match message.role {
        Role::User => ("User", "message message-user"),
        _ => ("Assistant", "message message-assistant"),
    };

    view! {
        <div class=class>
            <span class="role">{label}</span>
            <p class="content">{message.content}</p>
        </div>
    }
}

/// Sidebar history, newest first
#[component]
pub fn ConversationList(session: RwSignal<ChatSession>) -> impl IntoView {
    view! {
        <ul class="conversations">
            <For
                each=move || session.with(|s| s.sidebar())
                key=|summary| summary.id.clone()
                children=move |summary| {
                    let id = summary.id.clone();
                    let active_id = summary.id.clone();
                    view! {
                        <li class:active=move || session.with(|s| s.current_id() == Some(&active_id))>
                            <button on:click=move |_| {
                                session.update(|s| {
                                    if let Err(e) = s.select(&id) {
                                        leptos::logging::warn!("{e}");
                                    }
                                });
                            }>
                                {summary.title}
                            </button>
                        </li>
                    }
                }
            />
        </ul>
    }
}

/// Footer totals
#[component]
pub fn StatsFooter(session: RwSignal<ChatSession>) -> impl IntoView {
    let stats = move || session.with(|s| s.stats());

    view! {
        <footer class="stats">
            {move || {
                let SessionStats { conversations, messages } = stats();
                format!("{conversations} conversations · {messages} messages")
            }}
        </footer>
    }
}
