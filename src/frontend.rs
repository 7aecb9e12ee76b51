use crate::contact::{DraftField, MessageDraft, RelayError, RelayPayload, RelayStatus};
use crate::counter::{
    CounterApi, CounterError, CounterPayload, CounterState, CounterSync, MemorySession,
    SessionStore,
};
use crate::disclosure::{DisclosureEvent, DisclosureState, Key};
use crate::feed::{load_feed, parse_entries, FeedEntry, FeedError, FeedState, RankedItem};
use crate::lifecycle::{MountScope, Subscription};
use crate::metrics::{compute_metrics, DeviceMode, Viewport};
use crate::motion::WIDTH_SPRING;
use crate::site::{
    counter_get_url, counter_hit_url, feed_url, profile_url, SocialLink, CLIENT_LOGGER,
    COUNTER_POLL_INTERVAL_MS, FEED_DISPLAY_CAP, FEED_PLACEHOLDER_CARDS, OWNER_LOCATION,
    OWNER_NAME, OWNER_ROLE, RELAY_ENDPOINT, RESUME_PATH, SOCIAL_LINKS, TECHNOLOGIES,
};
use crate::theme::{Theme, THEME_KEY};
use crate::typewriter::Typewriter;
use gloo_events::EventListener;
use gloo_net::http::Request;
use gloo_render::request_animation_frame;
use gloo_timers::callback::{Interval, Timeout};
use js_sys::{Date, Function, Reflect};
use serde_json::json;
use std::future::Future;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    window, Element, Event, HtmlInputElement, HtmlTextAreaElement, KeyboardEvent, Node, Storage,
};
use yew::prelude::*;

const FALLBACK_VIEWPORT: Viewport = Viewport::new(1280.0, 720.0);
const CLOCK_INTERVAL_MS: u32 = 1_000;

thread_local! {
    static FALLBACK_SESSION: MemorySession = MemorySession::default();
}

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

fn read_stored_theme() -> Option<String> {
    local_storage()?.get_item(THEME_KEY).ok().flatten()
}

fn system_prefers_dark() -> bool {
    window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn resolve_theme() -> Theme {
    Theme::resolve(read_stored_theme().as_deref(), system_prefers_dark())
}

fn apply_theme(theme: Theme) {
    if let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|document| document.document_element())
    {
        let _ = root.set_attribute("data-theme", theme.as_str());
    }
}

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn apply_theme_with_transition(theme: Theme) {
    if prefers_reduced_motion() {
        apply_theme(theme);
        return;
    }

    let Some(document) = window().and_then(|w| w.document()) else {
        apply_theme(theme);
        return;
    };

    let document_js: JsValue = document.into();
    let Ok(start_view_transition) =
        Reflect::get(&document_js, &JsValue::from_str("startViewTransition"))
    else {
        apply_theme(theme);
        return;
    };

    let Some(start_view_transition) = start_view_transition.dyn_ref::<Function>() else {
        apply_theme(theme);
        return;
    };

    // The browser invokes the update callback later; it frees itself once run.
    let callback = Closure::once_into_js(move || apply_theme(theme));

    if start_view_transition.call1(&document_js, &callback).is_err() {
        apply_theme(theme);
    }
}

fn persist_theme(theme: Theme) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(THEME_KEY, theme.as_str());
    }
}

fn viewport_size() -> Viewport {
    let Some(win) = window() else {
        return FALLBACK_VIEWPORT;
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(FALLBACK_VIEWPORT.width);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(FALLBACK_VIEWPORT.height);

    Viewport::new(width, height)
}

/// Current viewport, refreshed on every window resize while mounted.
#[hook]
fn use_viewport() -> Viewport {
    let viewport = use_state(viewport_size);

    {
        let viewport = viewport.clone();
        use_effect_with((), move |_| {
            let listener = window().map(|win| {
                EventListener::new(&win, "resize", move |_event: &Event| {
                    viewport.set(viewport_size());
                })
            });

            move || drop(listener)
        });
    }

    *viewport
}

fn clock_label() -> String {
    let now = Date::new_0();
    format!(
        "{:02}:{:02}:{:02}",
        now.get_hours(),
        now.get_minutes(),
        now.get_seconds()
    )
}

#[hook]
fn use_clock() -> String {
    let label = use_state(clock_label);

    {
        let label = label.clone();
        use_effect_with((), move |_| {
            let ticker = Interval::new(CLOCK_INTERVAL_MS, move || label.set(clock_label()));
            move || drop(ticker)
        });
    }

    (*label).clone()
}

/// Role line typed and erased in a loop; static when motion is reduced.
#[hook]
fn use_typewriter(text: &'static str) -> &'static str {
    let typewriter = use_state(|| Typewriter::new(text));
    let still = use_memo((), |_| prefers_reduced_motion());

    {
        let typewriter = typewriter.clone();
        let still = *still;
        use_effect_with(*typewriter, move |current| {
            let step = (!still).then(|| {
                let next = current.advance();
                Timeout::new(current.delay_ms(), move || typewriter.set(next))
            });
            move || drop(step)
        });
    }

    if *still {
        text
    } else {
        typewriter.visible()
    }
}

async fn request_feed() -> Result<Vec<FeedEntry>, FeedError> {
    let response = Request::get(&feed_url())
        .send()
        .await
        .map_err(|_| FeedError::Network)?;

    if !response.ok() {
        return Err(FeedError::Status(response.status()));
    }

    let body = response.binary().await.map_err(|_| FeedError::Network)?;
    parse_entries(&body).map_err(|_| FeedError::Malformed)
}

async fn fetch_feed() -> Result<Vec<FeedEntry>, FeedError> {
    let result = request_feed().await;

    if let Err(error) = result {
        CLIENT_LOGGER.info(
            "feed_fetch_failed",
            json!({ "error_class": error.as_str(), "status": error.status_code() }),
        );
    }

    result
}

#[derive(Clone, Copy)]
struct CountApi;

async fn request_counter(url: String) -> Result<i64, CounterError> {
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|_| CounterError::Network)?;

    if !response.ok() {
        return Err(CounterError::Status(response.status()));
    }

    response
        .json::<CounterPayload>()
        .await
        .map(|payload| payload.value)
        .map_err(|_| CounterError::Malformed)
}

impl CounterApi for CountApi {
    fn increment(&self) -> impl Future<Output = Result<i64, CounterError>> + 'static {
        request_counter(counter_hit_url())
    }

    fn read(&self) -> impl Future<Output = Result<i64, CounterError>> + 'static {
        request_counter(counter_get_url())
    }
}

#[derive(Clone)]
enum SessionBackend {
    Browser(Storage),
    Memory(MemorySession),
}

impl SessionBackend {
    fn resolve() -> Self {
        window()
            .and_then(|w| w.session_storage().ok().flatten())
            .map(Self::Browser)
            .unwrap_or_else(|| Self::Memory(FALLBACK_SESSION.with(Clone::clone)))
    }
}

impl SessionStore for SessionBackend {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            Self::Browser(storage) => storage.get_item(key).ok().flatten(),
            Self::Memory(session) => session.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self {
            Self::Browser(storage) => {
                let _ = storage.set_item(key, value);
            }
            Self::Memory(session) => session.set(key, value),
        }
    }

    fn remove(&self, key: &str) {
        match self {
            Self::Browser(storage) => {
                let _ = storage.remove_item(key);
            }
            Self::Memory(session) => session.remove(key),
        }
    }
}

fn log_counter_failure(event: &str, error: CounterError) {
    CLIENT_LOGGER.debug(event, json!({ "error_class": error.as_str() }));
}

enum CounterAction {
    Settled(CounterState),
    Polled(Result<Option<i64>, CounterError>),
}

impl Reducible for CounterState {
    type Action = CounterAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match action {
            CounterAction::Settled(state) => state,
            CounterAction::Polled(outcome) => self.after_poll(&outcome),
        };

        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

#[function_component(VisitorCard)]
fn visitor_card() -> Html {
    let counter = use_reducer(CounterState::default);
    let clock = use_clock();

    {
        let dispatcher = counter.dispatcher();
        use_effect_with((), move |_| {
            let sync = Rc::new(CounterSync::new(CountApi, SessionBackend::resolve()));

            {
                let dispatcher = dispatcher.clone();
                let mount = sync.mount();
                spawn_local(async move {
                    match mount.await {
                        Ok(Some(state)) => dispatcher.dispatch(CounterAction::Settled(state)),
                        Ok(None) => {}
                        Err(error) => log_counter_failure("counter_mount_failed", error),
                    }
                });
            }

            let poller = {
                let sync = sync.clone();
                Interval::new(COUNTER_POLL_INTERVAL_MS, move || {
                    let Some(poll) = sync.poll() else {
                        return;
                    };
                    let dispatcher = dispatcher.clone();
                    spawn_local(async move {
                        let outcome = poll.await;
                        if let Err(error) = outcome {
                            log_counter_failure("counter_poll_failed", error);
                        }
                        dispatcher.dispatch(CounterAction::Polled(outcome));
                    });
                })
            };
            let subscription = Subscription::new(poller, sync.scope().clone());

            move || drop(subscription)
        });
    }

    html! {
        <div class="visitor-card" aria-live="polite">
            <span class="visitor-clock">{clock}</span>
            <span class="visitor-label">{"VISITORS"}</span>
            <span class="visitor-count">{counter.value}</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ProfileHeaderProps {
    theme: Theme,
    contact_open: bool,
    on_toggle_theme: Callback<()>,
    on_toggle_contact: Callback<()>,
}

#[function_component(ProfileHeader)]
fn profile_header(props: &ProfileHeaderProps) -> Html {
    let role = use_typewriter(OWNER_ROLE);
    let on_theme = {
        let on_toggle_theme = props.on_toggle_theme.clone();
        Callback::from(move |_: MouseEvent| on_toggle_theme.emit(()))
    };
    let on_contact = {
        let on_toggle_contact = props.on_toggle_contact.clone();
        Callback::from(move |_: MouseEvent| on_toggle_contact.emit(()))
    };

    html! {
        <header class="profile-header" aria-labelledby="identity-heading">
            <button
                class="theme-toggle"
                type="button"
                aria-label={props.theme.toggle_label()}
                aria-pressed={props.theme.pressed().to_string()}
                onclick={on_theme}
            >
                <span aria-hidden="true">{props.theme.icon()}</span>
                <span class="theme-toggle-label">{props.theme.toggle_label()}</span>
            </button>
            <div class="profile-details">
                <h1 id="identity-heading">{OWNER_NAME}</h1>
                <p class="profile-location">{OWNER_LOCATION}</p>
                <p class="profile-role" aria-label={OWNER_ROLE}>
                    <span aria-hidden="true">{role}</span>
                    <span class="typing-caret" aria-hidden="true" />
                </p>
                <div class="profile-actions">
                    <VisitorCard />
                    <a class="action-button" href={RESUME_PATH} download="resume.pdf">
                        {"Download Resume"}
                    </a>
                    <button
                        class="action-button"
                        type="button"
                        aria-expanded={props.contact_open.to_string()}
                        aria-controls="contact"
                        onclick={on_contact}
                    >
                        {"Contact Me"}
                    </button>
                </div>
            </div>
        </header>
    }
}

fn repo_card(item: &RankedItem) -> Html {
    html! {
        <a
            key={item.id}
            class="repo-card"
            href={item.external_url.clone()}
            target="_blank"
            rel="noopener noreferrer"
        >
            <h5 class="repo-name">{item.display_name.clone()}</h5>
            <p class="repo-description">{item.description_or_default().to_string()}</p>
            <div class="repo-stats">
                <span title="Stars">{"★ "}{item.primary_metric}</span>
                <span title="Forks">{"⑂ "}{item.fork_count}</span>
            </div>
            <div class="repo-meta">
                if let Some(category) = item.category.clone() {
                    <span class="repo-language">{category}</span>
                }
                if let Some(updated) = item.updated_label() {
                    <span class="repo-updated">{updated}</span>
                }
            </div>
        </a>
    }
}

#[function_component(RepositorySection)]
fn repository_section() -> Html {
    let feed = use_state(|| FeedState::Loading);
    let show_technologies = use_state(|| false);
    let metrics = compute_metrics(use_viewport(), None);

    {
        let feed = feed.clone();
        use_effect_with((), move |_| {
            let scope = MountScope::new();
            let pending = load_feed(fetch_feed(), &scope, FEED_DISPLAY_CAP);

            spawn_local(async move {
                if let Some(next) = pending.await {
                    feed.set(next);
                }
            });

            move || scope.teardown()
        });
    }

    let total = feed
        .total()
        .map(|total| total.to_string())
        .unwrap_or_else(|| "…".to_string());
    let slide_style = format!("--slide-distance: {:.0}px;", -metrics.animation_distance);

    let open_technologies = {
        let show_technologies = show_technologies.clone();
        Callback::from(move |_: MouseEvent| show_technologies.set(true))
    };
    let close_technologies = {
        let show_technologies = show_technologies.clone();
        Callback::from(move |_| show_technologies.set(false))
    };

    let content = match &*feed {
        FeedState::Loading => html! {
            <div class="repo-grid" aria-busy="true">
                { for (0..FEED_PLACEHOLDER_CARDS).map(|index| html! {
                    <div key={index} class="repo-card is-placeholder" />
                }) }
            </div>
        },
        FeedState::Error(message) => html! {
            <div class="feed-error" role="alert">{message.clone()}</div>
        },
        FeedState::Ready { items, .. } => html! {
            <div class="repo-grid">
                { for items.iter().map(repo_card) }
            </div>
        },
    };

    html! {
        <section class="section-block slide-in" style={slide_style} aria-labelledby="repos-heading">
            <div class="section-heading">
                <div>
                    <h2 id="repos-heading">{"GitHub"}</h2>
                    <p class="muted">{"Repositories, recent activity, and contributions."}</p>
                </div>
                <div class="repo-total">
                    <span>{total}</span>
                    <a href={profile_url()} target="_blank" rel="noreferrer">{"View Profile"}</a>
                </div>
            </div>
            <h3>{"Repositories"}</h3>
            {content}
            <div class="tech-open">
                <button class="action-button" type="button" aria-haspopup="dialog" onclick={open_technologies}>
                    {"View Technologies"}
                </button>
            </div>
            if *show_technologies {
                <TechnologiesDialog on_close={close_technologies} />
            }
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct TechnologiesDialogProps {
    on_close: Callback<()>,
}

#[function_component(TechnologiesDialog)]
fn technologies_dialog(props: &TechnologiesDialogProps) -> Html {
    {
        let on_close = props.on_close.clone();
        use_effect_with((), move |_| {
            let listener = window().and_then(|w| w.document()).map(|document| {
                EventListener::new(&document, "keydown", move |event: &Event| {
                    let escaped = event
                        .dyn_ref::<KeyboardEvent>()
                        .is_some_and(|event| Key::from_key_value(&event.key()) == Key::Escape);
                    if escaped {
                        on_close.emit(());
                    }
                })
            });
            move || drop(listener)
        });
    }

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class="tech-dialog-shell">
            <div class="tech-backdrop" onclick={close.clone()} />
            <div class="tech-dialog" role="dialog" aria-modal="true" aria-labelledby="tech-heading">
                <div class="tech-dialog-header">
                    <h3 id="tech-heading">{"Technologies"}</h3>
                    <button class="contact-close" type="button" aria-label="Close technologies" onclick={close}>
                        {"✕"}
                    </button>
                </div>
                <p class="muted">
                    {format!(
                        "A total of {} languages and technologies that I work and used to work with.",
                        TECHNOLOGIES.len()
                    )}
                </p>
                <ul class="tech-list">
                    { for TECHNOLOGIES.iter().map(|name| html! { <li key={*name}>{*name}</li> }) }
                </ul>
            </div>
        </div>
    }
}

async fn send_message(draft: MessageDraft) -> Result<(), RelayError> {
    let request = Request::post(RELAY_ENDPOINT)
        .json(&RelayPayload::new(&draft))
        .map_err(|_| RelayError::Network)?;
    let response = request.send().await.map_err(|_| RelayError::Network)?;

    if response.ok() {
        Ok(())
    } else {
        Err(RelayError::Rejected(response.status()))
    }
}

fn input_value(event: &InputEvent) -> Option<String> {
    if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
        return Some(input.value());
    }
    event
        .target_dyn_into::<HtmlTextAreaElement>()
        .map(|area| area.value())
}

#[derive(Properties, PartialEq)]
struct ContactSectionProps {
    on_close: Callback<()>,
}

#[function_component(ContactSection)]
fn contact_section(props: &ContactSectionProps) -> Html {
    let draft = use_state(MessageDraft::default);
    let status = use_state(RelayStatus::default);
    let section_ref = use_node_ref();
    let scope = use_memo((), |_| MountScope::new());

    {
        let section_ref = section_ref.clone();
        let scope = scope.clone();
        use_effect_with((), move |_| {
            if let Some(section) = section_ref.cast::<Element>() {
                section.scroll_into_view();
            }
            move || scope.teardown()
        });
    }

    let on_field = |field: DraftField| {
        let draft = draft.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(value) = input_value(&event) {
                draft.set(draft.with_field(field, value));
            }
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let status = status.clone();
        let scope = scope.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if !draft.is_complete() || *status == RelayStatus::Sending {
                return;
            }

            status.set(RelayStatus::Sending);
            let ticket = scope.ticket();
            let message = (*draft).clone();
            let draft = draft.clone();
            let status = status.clone();
            let scope = scope.clone();

            spawn_local(async move {
                let result = send_message(message).await;
                if let Err(error) = result {
                    CLIENT_LOGGER.debug("relay_send_failed", json!({ "error_class": error.as_str() }));
                }
                if !scope.admit(ticket) {
                    return;
                }
                if result.is_ok() {
                    draft.set(MessageDraft::default());
                }
                status.set(RelayStatus::from_result(result));
            });
        })
    };

    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <section id="contact" class="section-block contact" ref={section_ref} aria-labelledby="contact-heading">
            <button class="contact-close" type="button" aria-label="Close contact form" onclick={on_close}>
                {"✕"}
            </button>
            <h2 id="contact-heading">{"Get in touch."}</h2>
            <p class="muted">
                {"Considering to be in contact with me regarding a project? Perhaps collaboration? Or just about anything?"}
            </p>
            <form class="contact-form" onsubmit={on_submit}>
                <label for="email">{"Email"}</label>
                <input id="email" type="email" required={true} value={draft.email.clone()} oninput={on_field(DraftField::Email)} />
                <label for="name">{"Name"}</label>
                <input id="name" type="text" required={true} value={draft.name.clone()} oninput={on_field(DraftField::Name)} />
                <label for="message">{"Message"}</label>
                <textarea id="message" rows="5" required={true} value={draft.message.clone()} oninput={on_field(DraftField::Message)} />
                <button class="action-button" type="submit" disabled={*status == RelayStatus::Sending}>
                    {"Send"}
                </button>
                if let Some(line) = status.status_line() {
                    <p class="contact-status" role="status">{line}</p>
                }
            </form>
        </section>
    }
}

impl Reducible for DisclosureState {
    type Action = DisclosureEvent;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = *self;
        if next.apply(action).changed {
            Rc::new(next)
        } else {
            self
        }
    }
}

fn event_target_node(event: &Event) -> Option<Node> {
    event.target()?.dyn_into::<Node>().ok()
}

/// Document-level listeners that close the widget; held only while it is open.
fn install_dismiss_listeners(
    region: NodeRef,
    dispatcher: UseReducerDispatcher<DisclosureState>,
) -> Vec<EventListener> {
    let Some(document) = window().and_then(|w| w.document()) else {
        return Vec::new();
    };

    let pointer = {
        let dispatcher = dispatcher.clone();
        EventListener::new(&document, "pointerdown", move |event: &Event| {
            let inside = event_target_node(event)
                .zip(region.get())
                .is_some_and(|(target, root)| root.contains(Some(&target)));
            dispatcher.dispatch(DisclosureEvent::PointerDown { inside });
        })
    };

    let keyboard = EventListener::new(&document, "keydown", move |event: &Event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if Key::from_key_value(&event.key()) == Key::Escape {
            dispatcher.dispatch(DisclosureEvent::Key(Key::Escape));
        }
    });

    vec![pointer, keyboard]
}

fn social_entry(link: &SocialLink, on_select: &Callback<MouseEvent>, menu: bool) -> Html {
    html! {
        <a
            key={link.label}
            class={classes!("connect-link", menu.then_some("is-menu-item"))}
            href={link.url}
            target="_blank"
            rel="noopener noreferrer"
            role={menu.then_some("menuitem")}
            aria-label={link.label}
            onclick={on_select.clone()}
        >
            <span class="connect-glyph" aria-hidden="true">{link.glyph}</span>
            <span class="connect-link-label">{link.label}</span>
        </a>
    }
}

#[function_component(ConnectWidget)]
fn connect_widget() -> Html {
    let viewport = use_viewport();
    let state = use_reducer(|| DisclosureState::new(viewport, SOCIAL_LINKS.len()));
    let region = use_node_ref();
    let revealed = use_state(|| false);

    {
        let dispatcher = state.dispatcher();
        use_effect_with(viewport, move |viewport| {
            dispatcher.dispatch(DisclosureEvent::Resize(*viewport));
            || ()
        });
    }

    {
        let dispatcher = state.dispatcher();
        let region = region.clone();
        use_effect_with(state.wants_outside_listeners(), move |wanted| {
            let listeners = wanted.then(|| install_dismiss_listeners(region, dispatcher));
            move || drop(listeners)
        });
    }

    {
        let revealed = revealed.clone();
        use_effect_with(state.shows_inline_entries(), move |showing| {
            let frame = if *showing {
                Some(request_animation_frame(move |_| revealed.set(true)))
            } else {
                revealed.set(false);
                None
            };
            move || drop(frame)
        });
    }

    let onclick = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(DisclosureEvent::Activate))
    };

    let onkeydown = {
        let state = state.clone();
        Callback::from(move |event: KeyboardEvent| {
            let on_trigger = event.target() == event.current_target();
            let Some(action) =
                DisclosureEvent::from_trigger_key(Key::from_key_value(&event.key()), on_trigger)
            else {
                return;
            };

            let mut next = *state;
            if next.apply(action).prevent_default {
                event.prevent_default();
            }
            state.dispatch(action);
        })
    };

    let on_select = {
        let dispatcher = state.dispatcher();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            dispatcher.dispatch(DisclosureEvent::EntrySelected);
        })
    };

    let on_dismiss = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(DisclosureEvent::Dismiss))
    };

    let trigger_style = format!(
        "width: {:.0}px; transition: {};",
        state.measured_width,
        WIDTH_SPRING.css_transition("width")
    );
    let wide = state.device_mode == DeviceMode::Wide;

    html! {
        <div class={classes!("connect", state.device_mode.as_str())} ref={region}>
            <div class="connect-ripple" aria-hidden="true" />
            <div
                class="connect-trigger"
                role="button"
                tabindex="0"
                aria-expanded={state.open.to_string()}
                aria-haspopup="true"
                style={trigger_style}
                {onclick}
                {onkeydown}
            >
                if state.shows_inline_entries() {
                    <div class={classes!("connect-links", revealed.then_some("is-revealed"))}>
                        { for SOCIAL_LINKS.iter().map(|link| social_entry(link, &on_select, false)) }
                    </div>
                }
                <div class="connect-label">
                    if wide && !state.open {
                        <span class="connect-caption">{"Connect with me"}</span>
                    }
                    <span class="connect-icon" aria-hidden="true">{"👥"}</span>
                </div>
            </div>
            if let Some(panel_width) = state.panel_width() {
                <div
                    class="connect-panel"
                    role="menu"
                    aria-label="Social links"
                    style={format!(
                        "width: {:.0}px; max-height: {:.0}px;",
                        panel_width,
                        state.metrics().compact_panel_max_height
                    )}
                >
                    <button class="connect-dismiss" type="button" aria-label="Close social links" onclick={on_dismiss}>
                        {"✕"}
                    </button>
                    { for SOCIAL_LINKS.iter().map(|link| social_entry(link, &on_select, true)) }
                </div>
            }
        </div>
    }
}

#[function_component(SiteFooter)]
fn site_footer() -> Html {
    let year = Date::new_0().get_full_year();

    html! {
        <footer class="site-footer">
            <p class="muted">{format!("© {year} {OWNER_NAME}.")}</p>
            <ConnectWidget />
        </footer>
    }
}

#[function_component(App)]
fn app() -> Html {
    let theme = use_state(resolve_theme);
    let show_contact = use_state(|| false);

    {
        let current = *theme;
        use_effect_with((), move |_| {
            apply_theme(current);
            || ()
        });
    }

    let on_toggle_theme = {
        let theme = theme.clone();
        Callback::from(move |_| {
            let next = (*theme).toggled();
            persist_theme(next);
            apply_theme_with_transition(next);
            theme.set(next);
        })
    };

    let on_toggle_contact = {
        let show_contact = show_contact.clone();
        Callback::from(move |_| show_contact.set(!*show_contact))
    };

    let on_close_contact = {
        let show_contact = show_contact.clone();
        Callback::from(move |_| show_contact.set(false))
    };

    html! {
        <>
            <a class="skip-link" href="#content">{"Skip to main content"}</a>
            <div class="page-shell">
                <ProfileHeader
                    theme={*theme}
                    contact_open={*show_contact}
                    on_toggle_theme={on_toggle_theme}
                    on_toggle_contact={on_toggle_contact}
                />
                <main id="content">
                    <RepositorySection />
                    if *show_contact {
                        <ContactSection on_close={on_close_contact} />
                    }
                </main>
                <SiteFooter />
            </div>
        </>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
