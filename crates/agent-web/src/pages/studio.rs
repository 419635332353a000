//! Studio Page

use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};

use agent_core::{
    session::{render_reply, ChatBackend},
    Catalog, ChatSession, Message, QueryConfig,
};

use crate::api::{self, HttpBackend};
use crate::components::{ConversationList, MessageBubble, StatsFooter};

#[component]
pub fn StudioPage() -> impl IntoView {
    // Built-in until the server reports which providers it serves
    let catalog = RwSignal::new(Catalog::builtin());
    let session = RwSignal::new(ChatSession::new());

    let first_template = catalog.with_untracked(|c| c.templates.first().cloned());
    let first_provider = catalog.with_untracked(|c| c.provider_names().next().unwrap_or_default().to_string());
    let first_model = catalog.with_untracked(|c| c.models_for(&first_provider).first().cloned().unwrap_or_default());

    let (template, set_template) = signal(first_template.as_ref().map(|t| t.name.clone()).unwrap_or_default());
    let (system_prompt, set_system_prompt) = signal(first_template.map(|t| t.system_prompt).unwrap_or_default());
    let (provider, set_provider) = signal(first_provider);
    let (model, set_model) = signal(first_model);
    let (allow_search, set_allow_search) = signal(false);

    let (input, set_input) = signal(String::new());
    let (loading, set_loading) = signal(false);
    let (notice, set_notice) = signal(None::<String>);
    let (online, set_online) = signal(None::<bool>);

    let refresh_health = move || {
        leptos::task::spawn_local(async move {
            set_online.set(Some(api::check_health().await));
        });
    };
    refresh_health();

    let choose_provider = move |name: String| {
        let first = catalog.with_untracked(|c| c.models_for(&name).first().cloned().unwrap_or_default());
        set_model.set(first);
        set_provider.set(name);
    };

    leptos::task::spawn_local(async move {
        if let Some(served) = api::fetch_catalog().await {
            let current = provider.get_untracked();
            let fallback = if served.provider_names().any(|name| name == current) {
                None
            } else {
                served.provider_names().next().map(String::from)
            };
            catalog.set(served);
            if let Some(name) = fallback {
                choose_provider(name);
            }
        }
    });

    // Clear the input whenever an answered query advances the counter
    let answered = Memo::new(move |_| session.with(|s| s.query_counter()));
    Effect::new(move |_| {
        answered.track();
        set_input.set(String::new());
    });

    let choose_template = move |name: String| {
        if let Some(prompt) = catalog.with_untracked(|c| c.template(&name).map(|t| t.system_prompt.clone())) {
            set_system_prompt.set(prompt);
        }
        set_template.set(name);
    };

    let send = move || {
        if loading.get_untracked() {
            return;
        }
        let config = QueryConfig {
            provider: provider.get_untracked(),
            model: model.get_untracked(),
            template: template.get_untracked(),
            system_prompt: system_prompt.get_untracked(),
            allow_search: allow_search.get_untracked(),
        };
        let text = input.get_untracked();

        let Some(prepared) = session.try_update(|s| s.prepare_query(&text, &config)) else {
            return;
        };
        let pending = match prepared {
            Ok(pending) => pending,
            Err(e) => {
                set_notice.set(Some(e.to_string()));
                return;
            }
        };

        set_notice.set(None);
        set_loading.set(true);
        leptos::task::spawn_local(async move {
            let result = HttpBackend::new().send(&pending.request).await;
            let reply = render_reply(&result);
            session.update(|s| {
                if let Err(e) = s.record_reply(&pending, &reply) {
                    leptos::logging::warn!("Reply dropped: {e}");
                }
            });
            set_loading.set(false);
            refresh_health();
        });
    };

    let export = move |_| {
        let document = session.with_untracked(|s| s.export_conversations());
        let result = document
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
            .and_then(|json| download(&document.file_name(), &json));
        if let Err(e) = result {
            leptos::logging::error!("Export failed: {e:?}");
            set_notice.set(Some("Export failed.".into()));
        }
    };

    let header_model = move || {
        session.with(|s| match s.current_conversation() {
            Some(c) => (c.model_info.model.clone(), c.model_info.provider.clone()),
            None => (model.get(), provider.get()),
        })
    };

    let current_messages = move || {
        session.with(|s| {
            s.current_conversation()
                .map(|c| c.messages().iter().cloned().enumerate().collect::<Vec<(usize, Message)>>())
                .unwrap_or_default()
        })
    };

    view! {
        <div class="studio">
            <aside class="sidebar">
                <h2>"Agent Settings"</h2>

                <div class="field">
                    <label>"Template"</label>
                    <select on:change=move |ev| choose_template(event_target_value(&ev))>
                        {move || catalog.with(|c| c.templates.clone())
                            .into_iter()
                            .map(|t| {
                                let name = t.name.clone();
                                let selected = move || template.get() == name;
                                let value = t.name.clone();
                                view! { <option value=value selected=selected>{t.name}</option> }
                            })
                            .collect_view()}
                    </select>
                </div>

                <div class="field">
                    <label>"System Prompt"</label>
                    <textarea
                        prop:value=move || system_prompt.get()
                        on:input=move |ev| set_system_prompt.set(event_target_value(&ev))
                    />
                </div>

                <div class="field">
                    <label>"Provider"</label>
                    <select on:change=move |ev| choose_provider(event_target_value(&ev))>
                        {move || catalog.with(|c| c.provider_names().map(String::from).collect::<Vec<_>>())
                            .into_iter()
                            .map(|name| {
                                let current = name.clone();
                                let selected = move || provider.get() == current;
                                let value = name.clone();
                                view! { <option value=value selected=selected>{name}</option> }
                            })
                            .collect_view()}
                    </select>
                </div>

                <div class="field">
                    <label>"Model"</label>
                    <select on:change=move |ev| set_model.set(event_target_value(&ev))>
                        {move || catalog.with(|c| c.models_for(&provider.get()).to_vec())
                            .into_iter()
                            .map(|name| {
                                let current = name.clone();
                                let selected = move || model.get() == current;
                                let value = name.clone();
                                view! { <option value=value selected=selected>{name}</option> }
                            })
                            .collect_view()}
                    </select>
                </div>

                <label class="toggle">
                    <input
                        type="checkbox"
                        prop:checked=move || allow_search.get()
                        on:change=move |ev| set_allow_search.set(event_target_checked(&ev))
                    />
                    "Allow web search"
                </label>

                <label class="toggle">
                    <input
                        type="checkbox"
                        prop:checked=move || session.with(|s| s.chain_mode())
                        on:change=move |ev| {
                            let enabled = event_target_checked(&ev);
                            session.update(|s| s.set_chain_mode(enabled));
                        }
                    />
                    "Chain queries"
                </label>

                <h2>"Conversations"</h2>
                <div class="actions">
                    <button on:click=move |_| session.update(|s| s.new_chat()) disabled=move || loading.get()>
                        "New Chat"
                    </button>
                    <button on:click=move |_| session.update(|s| s.clear_all()) disabled=move || loading.get()>
                        "Clear All"
                    </button>
                    <button on:click=export>"Export"</button>
                </div>
                <ConversationList session=session />
            </aside>

            <main class="chat-main">
                <header class="status">
                    <span class="backend">
                        {move || match online.get() {
                            None => "Backend: checking...",
                            Some(true) => "Backend: Online",
                            Some(false) => "Backend: Offline",
                        }}
                    </span>
                    <span class="model">
                        {move || {
                            let (model_name, provider_name) = header_model();
                            format!("{model_name} ({provider_name})")
                        }}
                    </span>
                </header>

                <div class="messages">
                    <For
                        each=current_messages
                        key=|(index, message)| (*index, message.timestamp)
                        children=move |(_, message)| view! { <MessageBubble message=message /> }
                    />
                    <Show when=move || loading.get()>
                        <div class="message loading">"Thinking..."</div>
                    </Show>
                </div>

                <Show when=move || notice.get().is_some()>
                    <div class="notice">{move || notice.get().unwrap_or_default()}</div>
                </Show>

                <div class="input-area">
                    <textarea
                        placeholder="Ask anything..."
                        prop:value=move || input.get()
                        on:input=move |ev| set_input.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                send();
                            }
                        }
                    />
                    <button on:click=move |_| send() disabled=move || loading.get()>
                        {move || if loading.get() { "..." } else { "Send" }}
                    </button>
                </div>

                <StatsFooter session=session />
            </main>
        </div>
    }
}

/// Save `contents` through a transient data-URI link
fn download(file_name: &str, contents: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;

    let encoded = String::from(js_sys::encode_uri_component(contents));
    anchor.set_href(&format!("data:application/json;charset=utf-8,{encoded}"));
    anchor.set_download(file_name);
    anchor.click();
    Ok(())
}
