use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    window, AddEventListenerOptions, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    InputEvent, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MediaQueryListEvent, MouseEvent, SubmitEvent, TouchEvent, WheelEvent,
};
use yew::prelude::*;

use crate::motion;

const HOME_OBSERVER_THRESHOLD: f64 = 0.1;
const SKILLS_OBSERVER_THRESHOLD: f64 = 0.1;
const INTRO_STEP_MS: i32 = 360;
const INTRO_LEAVE_MS: i32 = 700;
const TYPE_KICKOFF_MS: i32 = 400;
const PARTICLE_COUNT: usize = 24;

const ROLES: [&str; 2] = ["Web Developer", "Data Science"];

const INTRO_GREETINGS: [&str; 6] = ["Hello", "नमस्ते", "Bonjour", "Hola", "こんにちは", "Welcome"];

const SKILLS: [&str; 11] = [
    "Java",
    "React",
    "Next.js",
    "TypeScript",
    "Tailwind CSS",
    "Python",
    "Docker",
    "Node.js",
    "MongoDB",
    "Angular",
    "FastAPI",
];

const NAV_LINKS: [(&str, &str); 6] = [
    ("#home", "Home"),
    ("#about", "About"),
    ("#skills", "Skills"),
    ("#project", "Projects"),
    ("#experience", "Experience"),
    ("#contact", "Contact"),
];

#[derive(Clone, PartialEq)]
struct ProjectEntry {
    title: &'static str,
    link: &'static str,
    bg_color: &'static str,
    image: &'static str,
    image_mobile: &'static str,
}

const PROJECTS: [ProjectEntry; 2] = [
    ProjectEntry {
        title: "Algorithm Visualization",
        link: "https://data-structure-algo.vercel.app/",
        bg_color: "#0d4d3d",
        image: "/assets/projects/algovis-wide.svg",
        image_mobile: "/assets/projects/algovis-tall.svg",
    },
    ProjectEntry {
        title: "Business Website",
        link: "https://quiet-haupia-7f074d.netlify.app/",
        bg_color: "#3884d3",
        image: "/assets/projects/business-wide.svg",
        image_mobile: "/assets/projects/business-tall.svg",
    },
];

#[derive(Clone, PartialEq)]
struct ExperienceEntry {
    role: &'static str,
    company: &'static str,
    duration: &'static str,
    description: &'static str,
}

const EXPERIENCES: [ExperienceEntry; 3] = [
    ExperienceEntry {
        role: "Web Developer",
        company: "I2I Specialist Technologies",
        duration: "2023",
        description: "Built high-performance web applications, integrated AI features, improved engagement by 10%.",
    },
    ExperienceEntry {
        role: "Web Developer Intern",
        company: "Scropy Tech",
        duration: "2025",
        description: "Gained hands-on web development experience.",
    },
    ExperienceEntry {
        role: "Data Analyst",
        company: "Elite Tech Intern",
        duration: "2025",
        description: "Built a Power BI dashboard to track sales, profit, and customer insights.",
    },
];

#[derive(Clone, PartialEq)]
struct Testimonial {
    quote: &'static str,
    author: &'static str,
    role: &'static str,
}

const TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        quote: "Sujay took a vague idea and shipped a polished product ahead of schedule. The attention to small interactions stood out.",
        author: "Priya Deshmukh",
        role: "Product Lead, I2I Specialist Technologies",
    },
    Testimonial {
        quote: "Fast, communicative, and unafraid of unfamiliar territory. Our dashboard went from mockup to production in three weeks.",
        author: "Rahul Khanna",
        role: "Founder, Scropy Tech",
    },
    Testimonial {
        quote: "The rare developer who cares as much about the data behind the page as the page itself.",
        author: "Meera Iyer",
        role: "Analytics Manager, Elite Tech",
    },
];

#[derive(Clone, PartialEq)]
struct Social {
    label: &'static str,
    glyph: &'static str,
    href: &'static str,
}

const SOCIALS: [Social; 4] = [
    Social {
        label: "X",
        glyph: "𝕏",
        href: "https://twitter.com",
    },
    Social {
        label: "LinkedIn",
        glyph: "in",
        href: "https://www.linkedin.com/in/sujay-bote-962637301/",
    },
    Social {
        label: "GitHub",
        glyph: "gh",
        href: "https://github.com/Sujay2910",
    },
    Social {
        label: "Instagram",
        glyph: "ig",
        href: "https://www.instagram.com/mr.sujaybote46",
    },
];

fn viewport_height() -> f64 {
    window()
        .and_then(|win| win.inner_height().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0)
}

fn scroll_offset_y() -> f64 {
    window().and_then(|win| win.scroll_y().ok()).unwrap_or(0.0)
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Option<i32> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

fn cancel_frame(handle: i32) {
    if let Some(win) = window() {
        let _ = win.cancel_animation_frame(handle);
    }
}

fn schedule_timeout(callback: &Closure<dyn FnMut()>, delay_ms: i32) -> Option<i32> {
    window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms,
        )
        .ok()
}

fn clear_scheduled_timeout(handle: i32) {
    if let Some(win) = window() {
        win.clear_timeout_with_handle(handle);
    }
}

fn add_passive_window_listener(event: &str, callback: &js_sys::Function) {
    let Some(win) = window() else {
        return;
    };

    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    let _ = win.add_event_listener_with_callback_and_add_event_listener_options(
        event, callback, &options,
    );
}

fn remove_window_listener(event: &str, callback: &js_sys::Function) {
    let Some(win) = window() else {
        return;
    };

    let _ = win.remove_event_listener_with_callback(event, callback);
}

/// Continuously rescheduled animation-frame loop. The callback receives the
/// rAF timestamp and the loop keeps itself alive until `cancel`, which must
/// run on teardown so repeated mount/unmount cycles never strand a frame
/// request.
struct FrameLoop {
    frame_handle: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl FrameLoop {
    fn start(mut on_frame: impl FnMut(f64) + 'static) -> Self {
        let frame_handle = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

        let scheduled = Closure::<dyn FnMut(f64)>::new({
            let frame_handle = frame_handle.clone();
            let callback = Rc::clone(&callback);
            move |timestamp: f64| {
                on_frame(timestamp);
                if let Some(current) = callback.borrow().as_ref() {
                    frame_handle.set(request_frame(current));
                }
            }
        });

        frame_handle.set(request_frame(&scheduled));
        *callback.borrow_mut() = Some(scheduled);

        Self {
            frame_handle,
            callback,
        }
    }

    fn cancel(self) {
        if let Some(handle) = self.frame_handle.take() {
            cancel_frame(handle);
        }
        self.callback.borrow_mut().take();
    }
}

/// Timer chain where each step names the delay until the next one, or `None`
/// to stop. Drives the intro sequence and the hero typewriter.
struct TimeoutChain {
    timer_handle: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl TimeoutChain {
    fn start(initial_delay_ms: i32, mut on_step: impl FnMut() -> Option<i32> + 'static) -> Self {
        let timer_handle = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

        let scheduled = Closure::<dyn FnMut()>::new({
            let timer_handle = timer_handle.clone();
            let callback = Rc::clone(&callback);
            move || {
                timer_handle.set(None);
                if let Some(delay) = on_step() {
                    if let Some(current) = callback.borrow().as_ref() {
                        timer_handle.set(schedule_timeout(current, delay));
                    }
                }
            }
        });

        timer_handle.set(schedule_timeout(&scheduled, initial_delay_ms));
        *callback.borrow_mut() = Some(scheduled);

        Self {
            timer_handle,
            callback,
        }
    }

    fn cancel(self) {
        if let Some(handle) = self.timer_handle.take() {
            clear_scheduled_timeout(handle);
        }
        self.callback.borrow_mut().take();
    }
}

/// Single pending timeout with cancel-on-reset discipline. Backs the navbar
/// hide deadline: every restart cancels the previous arm first.
struct ResettableTimeout {
    timer_handle: Rc<Cell<Option<i32>>>,
    callback: Closure<dyn FnMut()>,
}

impl ResettableTimeout {
    fn new(mut on_fire: impl FnMut() + 'static) -> Self {
        let timer_handle = Rc::new(Cell::new(None));
        let callback = Closure::<dyn FnMut()>::new({
            let timer_handle = timer_handle.clone();
            move || {
                timer_handle.set(None);
                on_fire();
            }
        });

        Self {
            timer_handle,
            callback,
        }
    }

    fn restart(&self, delay_ms: i32) {
        self.cancel_pending();
        self.timer_handle
            .set(schedule_timeout(&self.callback, delay_ms));
    }

    fn cancel_pending(&self) {
        if let Some(handle) = self.timer_handle.take() {
            clear_scheduled_timeout(handle);
        }
    }
}

fn observe_intersection(
    element: &Element,
    threshold: f64,
    callback: &Closure<dyn FnMut(js_sys::Array)>,
) -> Option<IntersectionObserver> {
    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options).ok()?;
    observer.observe(element);
    Some(observer)
}

fn first_entry(entries: &js_sys::Array) -> Option<IntersectionObserverEntry> {
    entries.get(0).dyn_into::<IntersectionObserverEntry>().ok()
}

#[hook]
fn use_intersecting(target: &NodeRef, threshold: f64) -> bool {
    let intersecting = use_state_eq(|| false);

    {
        let intersecting = intersecting.clone();
        use_effect_with(target.clone(), move |target| {
            let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
                if let Some(entry) = first_entry(&entries) {
                    intersecting.set(entry.is_intersecting());
                }
            });

            let observer = target
                .cast::<Element>()
                .and_then(|element| observe_intersection(&element, threshold, &callback));

            move || {
                if let Some(observer) = observer {
                    observer.disconnect();
                }
                drop(callback);
            }
        });
    }

    *intersecting
}

fn read_scene_progress(scene: &NodeRef) -> Option<f64> {
    let element = scene.cast::<Element>()?;
    let rect = element.get_bounding_client_rect();
    Some(motion::scene_progress(
        rect.top(),
        rect.height(),
        viewport_height(),
    ))
}

#[hook]
fn use_scene_progress(scene: &NodeRef) -> f64 {
    let progress = use_state_eq(|| 0.0_f64);

    {
        let progress = progress.clone();
        use_effect_with(scene.clone(), move |scene| {
            if let Some(initial) = read_scene_progress(scene) {
                progress.set(initial);
            }

            let recompute = Closure::<dyn FnMut()>::new({
                let scene = scene.clone();
                move || {
                    if let Some(next) = read_scene_progress(&scene) {
                        progress.set(next);
                    }
                }
            });

            add_passive_window_listener("scroll", recompute.as_ref().unchecked_ref());
            add_passive_window_listener("resize", recompute.as_ref().unchecked_ref());

            move || {
                remove_window_listener("scroll", recompute.as_ref().unchecked_ref());
                remove_window_listener("resize", recompute.as_ref().unchecked_ref());
                drop(recompute);
            }
        });
    }

    *progress
}

#[hook]
fn use_media_query(query: &'static str) -> bool {
    let matches = use_state_eq(|| {
        window()
            .and_then(|win| win.match_media(query).ok().flatten())
            .map(|list| list.matches())
            .unwrap_or(false)
    });

    {
        let matches = matches.clone();
        use_effect_with((), move |_| {
            let media_list = window().and_then(|win| win.match_media(query).ok().flatten());

            let on_change = Closure::<dyn FnMut(MediaQueryListEvent)>::new(
                move |event: MediaQueryListEvent| {
                    matches.set(event.matches());
                },
            );

            if let Some(list) = media_list.as_ref() {
                let _ = list
                    .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
            }

            move || {
                if let Some(list) = media_list {
                    let _ = list.remove_event_listener_with_callback(
                        "change",
                        on_change.as_ref().unchecked_ref(),
                    );
                }
                drop(on_change);
            }
        });
    }

    *matches
}

#[derive(Properties, PartialEq)]
struct IntroAnimationProps {
    on_finish: Callback<()>,
}

#[function_component(IntroAnimation)]
fn intro_animation(props: &IntroAnimationProps) -> Html {
    let greeting_index = use_state_eq(|| 0_usize);
    let leaving = use_state_eq(|| false);

    {
        let greeting_index = greeting_index.clone();
        let leaving = leaving.clone();
        let on_finish = props.on_finish.clone();
        use_effect_with((), move |_| {
            let mut step = 0_usize;
            let chain = TimeoutChain::start(INTRO_STEP_MS, move || {
                step += 1;
                if step < INTRO_GREETINGS.len() {
                    greeting_index.set(step);
                    Some(INTRO_STEP_MS)
                } else if step == INTRO_GREETINGS.len() {
                    leaving.set(true);
                    Some(INTRO_LEAVE_MS)
                } else {
                    on_finish.emit(());
                    None
                }
            });

            move || chain.cancel()
        });
    }

    let greeting = INTRO_GREETINGS[(*greeting_index).min(INTRO_GREETINGS.len() - 1)];

    html! {
        <div class={classes!("intro", (*leaving).then_some("intro--leaving"))}>
            <p class="intro__greeting">{greeting}</p>
            <div class="intro__dots" aria-hidden="true">
                { for INTRO_GREETINGS.iter().enumerate().map(|(index, _)| html! {
                    <span class={classes!(
                        "intro__dot",
                        (index <= *greeting_index).then_some("intro__dot--lit"),
                    )}></span>
                }) }
            </div>
        </div>
    }
}

#[function_component(CustomCursor)]
fn custom_cursor() -> Html {
    let dot_ref = use_node_ref();
    let ring_ref = use_node_ref();

    {
        let dot_ref = dot_ref.clone();
        let ring_ref = ring_ref.clone();
        use_effect_with((), move |_| {
            let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                let x = f64::from(event.client_x());
                let y = f64::from(event.client_y());

                if let Some(dot) = dot_ref.cast::<HtmlElement>() {
                    let _ = dot
                        .style()
                        .set_property("transform", &format!("translate3d({x:.0}px, {y:.0}px, 0)"));
                }
                if let Some(ring) = ring_ref.cast::<HtmlElement>() {
                    let _ = ring
                        .style()
                        .set_property("transform", &format!("translate3d({x:.0}px, {y:.0}px, 0)"));
                }
            });

            add_passive_window_listener("mousemove", on_move.as_ref().unchecked_ref());

            move || {
                remove_window_listener("mousemove", on_move.as_ref().unchecked_ref());
                drop(on_move);
            }
        });
    }

    html! {
        <>
            <div ref={dot_ref} class="cursor-dot" aria-hidden="true"></div>
            <div ref={ring_ref} class="cursor-ring" aria-hidden="true"></div>
        </>
    }
}

#[function_component(ParticlesBackground)]
fn particles_background() -> Html {
    let seeds = use_memo((), |_| {
        (0..PARTICLE_COUNT)
            .map(|_| {
                let left = js_sys::Math::random() * 100.0;
                let top = js_sys::Math::random() * 100.0;
                let size = 2.0 + js_sys::Math::random() * 3.0;
                let delay = js_sys::Math::random() * 6.0;
                let duration = 6.0 + js_sys::Math::random() * 8.0;
                format!(
                    "left: {left:.1}%; top: {top:.1}%; width: {size:.1}px; height: {size:.1}px; \
                     animation-delay: {delay:.2}s; animation-duration: {duration:.2}s;"
                )
            })
            .collect::<Vec<_>>()
    });

    html! {
        <div class="particles" aria-hidden="true">
            { for seeds.iter().map(|style| html! {
                <span class="particle" style={style.clone()}></span>
            }) }
        </div>
    }
}

#[function_component(Navbar)]
fn navbar() -> Html {
    let menu_open = use_state_eq(|| false);
    let visible = use_state_eq(|| true);
    let reveal = use_mut_ref(motion::NavReveal::default);

    {
        let visible = visible.clone();
        let reveal = reveal.clone();
        use_effect_with((), move |_| {
            let hide_timer = Rc::new(ResettableTimeout::new({
                let reveal = reveal.clone();
                let visible = visible.clone();
                move || {
                    let mut machine = reveal.borrow_mut();
                    machine.tick(now_ms());
                    let is_visible = machine.is_visible();
                    drop(machine);
                    visible.set(is_visible);
                }
            }));

            let on_scroll = Closure::<dyn FnMut()>::new({
                let reveal = reveal.clone();
                let visible = visible.clone();
                let hide_timer = hide_timer.clone();
                move || {
                    let now = now_ms();
                    let mut machine = reveal.borrow_mut();
                    let deadline_before = machine.hide_deadline();
                    machine.on_scroll(scroll_offset_y(), now);
                    let deadline_after = machine.hide_deadline();
                    let is_visible = machine.is_visible();
                    drop(machine);

                    if deadline_after != deadline_before {
                        match deadline_after {
                            Some(deadline) => hide_timer.restart((deadline - now).max(0.0) as i32),
                            None => hide_timer.cancel_pending(),
                        }
                    }
                    visible.set(is_visible);
                }
            });
            add_passive_window_listener("scroll", on_scroll.as_ref().unchecked_ref());

            let on_home_intersect = Closure::<dyn FnMut(js_sys::Array)>::new({
                let reveal = reveal.clone();
                let visible = visible.clone();
                let hide_timer = hide_timer.clone();
                move |entries: js_sys::Array| {
                    let Some(entry) = first_entry(&entries) else {
                        return;
                    };

                    let mut machine = reveal.borrow_mut();
                    machine.set_home_visible(entry.is_intersecting());
                    let is_visible = machine.is_visible();
                    let deadline = machine.hide_deadline();
                    drop(machine);

                    if deadline.is_none() {
                        hide_timer.cancel_pending();
                    }
                    visible.set(is_visible);
                }
            });

            let observer = window()
                .and_then(|win| win.document())
                .and_then(|document| document.get_element_by_id("home"))
                .and_then(|home| {
                    observe_intersection(&home, HOME_OBSERVER_THRESHOLD, &on_home_intersect)
                });

            move || {
                remove_window_listener("scroll", on_scroll.as_ref().unchecked_ref());
                drop(on_scroll);
                if let Some(observer) = observer {
                    observer.disconnect();
                }
                drop(on_home_intersect);
                hide_timer.cancel_pending();
            }
        });
    }

    let open_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(true))
    };
    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_| menu_open.set(false))
    };

    html! {
        <>
            <nav class={classes!("nav", (!*visible).then_some("nav--hidden"))}>
                <div class="nav__brand">
                    <span class="nav__mark" aria-hidden="true">{"SB"}</span>
                    <span class="nav__name">{"Sujay"}</span>
                </div>
                <button
                    class="nav__menu"
                    type="button"
                    aria-label="open menu"
                    onclick={open_menu}
                >
                    <span class="nav__menu-bar"></span>
                    <span class="nav__menu-bar"></span>
                    <span class="nav__menu-bar"></span>
                </button>
                <a class="nav__cta" href="#contact">{"Reach Out"}</a>
            </nav>
            <OverlayMenu open={*menu_open} on_close={close_menu} />
        </>
    }
}

#[derive(Properties, PartialEq)]
struct OverlayMenuProps {
    open: bool,
    on_close: Callback<()>,
}

#[function_component(OverlayMenu)]
fn overlay_menu(props: &OverlayMenuProps) -> Html {
    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div
            class={classes!("overlay-menu", props.open.then_some("overlay-menu--open"))}
            aria-hidden={(!props.open).to_string()}
        >
            <button
                class="overlay-menu__close"
                type="button"
                aria-label="close menu"
                onclick={close.clone()}
            >
                {"×"}
            </button>
            <ul class="overlay-menu__links">
                { for NAV_LINKS.iter().map(|(href, label)| html! {
                    <li><a href={*href} onclick={close.clone()}>{*label}</a></li>
                }) }
            </ul>
        </div>
    }
}

#[function_component(Home)]
fn home() -> Html {
    let typed = use_state_eq(String::new);

    {
        let typed = typed.clone();
        use_effect_with((), move |_| {
            let mut cycle =
                motion::TypingCycle::new(ROLES.iter().map(|role| role.to_string()).collect());
            let chain = TimeoutChain::start(TYPE_KICKOFF_MS, move || {
                let delay = cycle.step();
                typed.set(cycle.current_text().to_string());
                Some(delay as i32)
            });

            move || chain.cancel()
        });
    }

    html! {
        <section id="home" class="home">
            <ParticlesBackground />
            <div class="home__glow home__glow--top-left" aria-hidden="true"></div>
            <div class="home__glow home__glow--bottom-right" aria-hidden="true"></div>

            <div class="home__layout">
                <div class="home__copy">
                    <div class="home__typed">
                        <span>{(*typed).clone()}</span>
                        <span class="home__caret" aria-hidden="true"></span>
                    </div>

                    <h1 class="home__heading">
                        {"Hello, I'm"}
                        <br />
                        <span class="home__name">{"Sujay Bote"}</span>
                    </h1>

                    <p class="home__subtitle">
                        {"I turn complex ideas into seamless, high-impact web experiences, \
                          building modern, scalable, and lightning-fast applications that \
                          make a difference."}
                    </p>

                    <div class="home__actions">
                        <a class="home__action home__action--primary" href="#project">
                            {"View My Work"}
                        </a>
                        <a class="home__action home__action--secondary" href="/Bote_Sujay_Resume.pdf" download="">
                            {"My Resume"}
                        </a>
                    </div>

                    <div class="home__socials">
                        { for SOCIALS.iter().map(|social| html! {
                            <a
                                class="social-pill"
                                href={social.href}
                                target="_blank"
                                rel="noopener noreferrer"
                                aria-label={social.label}
                            >
                                {social.glyph}
                            </a>
                        }) }
                    </div>
                </div>

                <div class="home__portrait" aria-hidden="true">
                    <div class="home__portrait-halo"></div>
                    <img class="home__portrait-image" src="/assets/avatar.svg" alt="" />
                </div>
            </div>
        </section>
    }
}

#[function_component(About)]
fn about() -> Html {
    let section_ref = use_node_ref();
    let revealed = use_intersecting(&section_ref, 0.2);

    html! {
        <section
            id="about"
            ref={section_ref}
            class={classes!("about", revealed.then_some("about--revealed"))}
        >
            <h2 class="section-heading">{"About Me"}</h2>
            <div class="about__body">
                <p>
                    {"I'm a developer from Pune who enjoys the whole arc of building for \
                      the web: sketching an interaction, wiring the data behind it, and \
                      tuning it until it feels effortless."}
                </p>
                <p>
                    {"Lately that has meant shipping client sites, experimenting with \
                      machine-learning side projects, and turning messy spreadsheets into \
                      dashboards people actually read."}
                </p>
            </div>
            <ul class="about__stats">
                <li><span class="about__stat-value">{"2+"}</span>{"years building for the web"}</li>
                <li><span class="about__stat-value">{"10+"}</span>{"projects shipped"}</li>
                <li><span class="about__stat-value">{"3"}</span>{"teams collaborated with"}</li>
            </ul>
        </section>
    }
}

#[function_component(Skills)]
fn skills() -> Html {
    let section_ref = use_node_ref();
    let track_ref = use_node_ref();
    let active = use_intersecting(&section_ref, SKILLS_OBSERVER_THRESHOLD);
    let direction = use_mut_ref(motion::MarqueeDirection::default);
    let marquee = use_mut_ref(|| motion::Marquee::new(motion::MARQUEE_SPEED));

    {
        let direction = direction.clone();
        let marquee = marquee.clone();
        let track_ref = track_ref.clone();
        use_effect_with((active, track_ref), move |(active, track_ref)| {
            let mut teardown: Option<Box<dyn FnOnce()>> = None;

            if *active {
                let on_wheel = Closure::<dyn FnMut(WheelEvent)>::new({
                    let direction = direction.clone();
                    move |event: WheelEvent| direction.borrow_mut().on_wheel(event.delta_y())
                });
                let on_touch_start = Closure::<dyn FnMut(TouchEvent)>::new({
                    let direction = direction.clone();
                    move |event: TouchEvent| {
                        if let Some(touch) = event.touches().get(0) {
                            direction
                                .borrow_mut()
                                .on_touch_start(f64::from(touch.client_y()));
                        }
                    }
                });
                let on_touch_move = Closure::<dyn FnMut(TouchEvent)>::new({
                    let direction = direction.clone();
                    move |event: TouchEvent| {
                        if let Some(touch) = event.touches().get(0) {
                            direction
                                .borrow_mut()
                                .on_touch_move(f64::from(touch.client_y()));
                        }
                    }
                });
                let on_touch_end = Closure::<dyn FnMut(TouchEvent)>::new({
                    let direction = direction.clone();
                    move |_: TouchEvent| direction.borrow_mut().on_touch_end()
                });

                add_passive_window_listener("wheel", on_wheel.as_ref().unchecked_ref());
                add_passive_window_listener("touchstart", on_touch_start.as_ref().unchecked_ref());
                add_passive_window_listener("touchmove", on_touch_move.as_ref().unchecked_ref());
                add_passive_window_listener("touchend", on_touch_end.as_ref().unchecked_ref());

                let frame_loop = FrameLoop::start({
                    let direction = direction.clone();
                    let marquee = marquee.clone();
                    let track_ref = track_ref.clone();
                    let mut last_timestamp: Option<f64> = None;
                    move |timestamp| {
                        let dt = match last_timestamp.replace(timestamp) {
                            Some(previous) => ((timestamp - previous) / 1_000.0).max(0.0),
                            None => 0.0,
                        };

                        let Some(track) = track_ref.cast::<HtmlElement>() else {
                            return;
                        };

                        // Content is tiled twice, so one loop is half the track.
                        let loop_length = f64::from(track.scroll_width()) / 2.0;
                        let x = marquee.borrow_mut().advance(
                            direction.borrow().direction(),
                            dt,
                            loop_length,
                        );
                        let _ = track
                            .style()
                            .set_property("transform", &format!("translate3d({x:.2}px, 0, 0)"));
                    }
                });

                teardown = Some(Box::new(move || {
                    remove_window_listener("wheel", on_wheel.as_ref().unchecked_ref());
                    remove_window_listener("touchstart", on_touch_start.as_ref().unchecked_ref());
                    remove_window_listener("touchmove", on_touch_move.as_ref().unchecked_ref());
                    remove_window_listener("touchend", on_touch_end.as_ref().unchecked_ref());
                    drop(on_wheel);
                    drop(on_touch_start);
                    drop(on_touch_move);
                    drop(on_touch_end);
                    frame_loop.cancel();
                }));
            }

            move || {
                if let Some(teardown) = teardown {
                    teardown();
                }
            }
        });
    }

    html! {
        <section id="skills" ref={section_ref} class="skills">
            <div class="skills__glow skills__glow--left" aria-hidden="true"></div>
            <div class="skills__glow skills__glow--right" aria-hidden="true"></div>

            <h2 class="section-heading section-heading--gradient">{"My Skills"}</h2>
            <p class="skills__subtitle">{"Modern Applications | Modern Technologies"}</p>

            <div class="marquee">
                <div ref={track_ref} class="marquee__track">
                    { for SKILLS.iter().chain(SKILLS.iter()).map(|name| html! {
                        <div class="marquee__item">
                            <span class="marquee__badge" aria-hidden="true">
                                {name.chars().next().unwrap_or('?')}
                            </span>
                            <span class="marquee__label">{*name}</span>
                        </div>
                    }) }
                </div>
            </div>
        </section>
    }
}

#[function_component(Projects)]
fn projects() -> Html {
    let scene_ref = use_node_ref();
    let progress = use_scene_progress(&scene_ref);
    let is_mobile = use_media_query("(max-width: 639px)");

    let active = motion::active_index(progress, PROJECTS.len());
    let active_project = &PROJECTS[active];
    let scene_style = format!(
        "height: {}vh; background-color: {};",
        100 * PROJECTS.len(),
        active_project.bg_color,
    );

    html! {
        <section id="project" ref={scene_ref} class="project-scene" style={scene_style}>
            <div class="scene-viewport">
                <h2 class="scene-title">{"My Work"}</h2>

                <div class="project-stack">
                    { for PROJECTS.iter().enumerate().map(|(index, project)| {
                        let image = if is_mobile { project.image_mobile } else { project.image };
                        html! {
                            <div class={classes!(
                                "project-card",
                                (index == active).then_some("project-card--active"),
                            )}>
                                <h3 class="project-card__title">{project.title}</h3>
                                <div class="project-card__frame">
                                    <img src={image} alt={project.title} loading="lazy" />
                                    <div class="project-card__scrim" aria-hidden="true"></div>
                                </div>
                                <div class="project-card__cta">
                                    <a
                                        href={project.link}
                                        target="_blank"
                                        rel="noopener noreferrer"
                                    >
                                        {"View Project"}
                                    </a>
                                </div>
                            </div>
                        }
                    }) }
                </div>
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct ExperienceItemProps {
    entry: ExperienceEntry,
    index: usize,
    visual: motion::ItemVisual,
    desktop: bool,
}

#[function_component(ExperienceItem)]
fn experience_item(props: &ExperienceItemProps) -> Html {
    let visual = props.visual;
    let dot_style = format!(
        "opacity: {:.3}; transform: scale({:.3});",
        visual.opacity, visual.scale,
    );
    let card_style = format!(
        "opacity: {:.3}; transform: translateY({:.1}px);",
        visual.opacity, visual.translate_y,
    );
    let above = props.index % 2 == 0;

    html! {
        <div class={classes!(
            "timeline-item",
            if props.desktop { "timeline-item--row" } else { "timeline-item--column" },
            (props.desktop && above).then_some("timeline-item--above"),
        )}>
            <div class="timeline-item__dot" style={dot_style}></div>
            if props.desktop {
                <div
                    class="timeline-item__connector"
                    style={format!("opacity: {:.3};", visual.opacity)}
                ></div>
            }
            <article class="timeline-item__card" style={card_style}>
                <h3>{props.entry.role}</h3>
                <p class="timeline-item__meta">
                    {props.entry.company}{" | "}{props.entry.duration}
                </p>
                <p class="timeline-item__description">{props.entry.description}</p>
            </article>
        </div>
    }
}

#[function_component(Experience)]
fn experience() -> Html {
    let scene_ref = use_node_ref();
    let progress = use_scene_progress(&scene_ref);
    let desktop = use_media_query("(min-width: 768px)");

    let scene_height_vh = if desktop { 300 } else { 200 };
    let fill = format!("{:.1}%", progress * 100.0);

    let items = EXPERIENCES
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let visual = motion::ItemVisual::at(motion::segment_progress(
                progress,
                index,
                EXPERIENCES.len(),
            ));
            html! {
                <ExperienceItem
                    entry={entry.clone()}
                    index={index}
                    visual={visual}
                    desktop={desktop}
                />
            }
        })
        .collect::<Html>();

    html! {
        <section id="experience" class="experience">
            <div
                ref={scene_ref}
                class="experience__scene"
                style={format!("height: {scene_height_vh}vh;")}
            >
                <div class="scene-viewport experience__viewport">
                    <h2 class="scene-title">{"Experience"}</h2>

                    if desktop {
                        <div class="timeline timeline--row">
                            <div class="timeline__rail">
                                <div class="timeline__fill" style={format!("width: {fill};")}></div>
                            </div>
                            <div class="timeline__items timeline__items--row">
                                { items.clone() }
                            </div>
                        </div>
                    } else {
                        <div class="timeline timeline--column">
                            <div class="timeline__rail timeline__rail--column">
                                <div
                                    class="timeline__fill timeline__fill--column"
                                    style={format!("height: {fill};")}
                                ></div>
                            </div>
                            <div class="timeline__items timeline__items--column">
                                { items }
                            </div>
                        </div>
                    }
                </div>
            </div>
        </section>
    }
}

#[function_component(Testimonials)]
fn testimonials() -> Html {
    let section_ref = use_node_ref();
    let revealed = use_intersecting(&section_ref, 0.2);

    html! {
        <section
            id="testimonials"
            ref={section_ref}
            class={classes!("testimonials", revealed.then_some("testimonials--revealed"))}
        >
            <h2 class="section-heading">{"Kind Words"}</h2>
            <div class="testimonials__grid">
                { for TESTIMONIALS.iter().enumerate().map(|(index, testimonial)| html! {
                    <figure
                        class="testimonial-card"
                        style={format!("transition-delay: {}ms;", index * 150)}
                    >
                        <blockquote>{testimonial.quote}</blockquote>
                        <figcaption>
                            <span class="testimonial-card__author">{testimonial.author}</span>
                            <span class="testimonial-card__role">{testimonial.role}</span>
                        </figcaption>
                    </figure>
                }) }
            </div>
        </section>
    }
}

#[derive(Clone, PartialEq, Default)]
struct FeedbackDraft {
    name: String,
    email: String,
    feedback: String,
}

#[derive(Clone, Copy, PartialEq, Default)]
struct FieldErrors {
    name: bool,
    email: bool,
    feedback: bool,
}

impl FieldErrors {
    fn any(self) -> bool {
        self.name || self.email || self.feedback
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SubmitStatus {
    Idle,
    Sending,
    Success,
    Error,
}

#[derive(Serialize)]
struct FeedbackRequest {
    name: String,
    email: String,
    feedback: String,
}

#[derive(Deserialize)]
struct FeedbackResponse {
    ok: bool,
}

async fn submit_feedback(draft: &FeedbackDraft) -> bool {
    let payload = FeedbackRequest {
        name: draft.name.trim().to_string(),
        email: draft.email.trim().to_string(),
        feedback: draft.feedback.trim().to_string(),
    };

    let Ok(request) = Request::post("/api/feedback").json(&payload) else {
        return false;
    };
    let Ok(response) = request.send().await else {
        return false;
    };
    if !response.ok() {
        return false;
    }

    response
        .json::<FeedbackResponse>()
        .await
        .map(|body| body.ok)
        .unwrap_or(false)
}

#[function_component(Contact)]
fn contact() -> Html {
    let draft = use_state(FeedbackDraft::default);
    let errors = use_state_eq(FieldErrors::default);
    let status = use_state_eq(|| SubmitStatus::Idle);

    let on_name = {
        let draft = draft.clone();
        let errors = errors.clone();
        Callback::from(move |event: InputEvent| {
            let Some(input) = event.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let mut next = (*draft).clone();
            next.name = input.value();
            draft.set(next);
            if errors.name {
                errors.set(FieldErrors {
                    name: false,
                    ..*errors
                });
            }
        })
    };

    let on_email = {
        let draft = draft.clone();
        let errors = errors.clone();
        Callback::from(move |event: InputEvent| {
            let Some(input) = event.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let mut next = (*draft).clone();
            next.email = input.value();
            draft.set(next);
            if errors.email {
                errors.set(FieldErrors {
                    email: false,
                    ..*errors
                });
            }
        })
    };

    let on_feedback = {
        let draft = draft.clone();
        let errors = errors.clone();
        Callback::from(move |event: InputEvent| {
            let Some(input) = event.target_dyn_into::<HtmlTextAreaElement>() else {
                return;
            };
            let mut next = (*draft).clone();
            next.feedback = input.value();
            draft.set(next);
            if errors.feedback {
                errors.set(FieldErrors {
                    feedback: false,
                    ..*errors
                });
            }
        })
    };

    let onsubmit = {
        let draft = draft.clone();
        let errors = errors.clone();
        let status = status.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();

            let current = (*draft).clone();
            let next_errors = FieldErrors {
                name: current.name.trim().is_empty(),
                email: current.email.trim().is_empty(),
                feedback: current.feedback.trim().is_empty(),
            };
            if next_errors.any() {
                errors.set(next_errors);
                return;
            }

            errors.set(FieldErrors::default());
            status.set(SubmitStatus::Sending);

            let draft = draft.clone();
            let status = status.clone();
            spawn_local(async move {
                if submit_feedback(&current).await {
                    status.set(SubmitStatus::Success);
                    draft.set(FeedbackDraft::default());
                } else {
                    status.set(SubmitStatus::Error);
                }
            });
        })
    };

    let status_line = match *status {
        SubmitStatus::Idle => None,
        SubmitStatus::Sending => Some(("contact__status--sending", "Sending...")),
        SubmitStatus::Success => Some(("contact__status--success", "Feedback sent successfully.")),
        SubmitStatus::Error => Some(("contact__status--error", "Failed to send. Please try again.")),
    };

    html! {
        <section id="contact" class="contact">
            <ParticlesBackground />

            <div class="contact__layout">
                <div class="contact__art" aria-hidden="true">
                    <img src="/assets/astra.svg" alt="" />
                </div>

                <div class="contact__panel">
                    <h2 class="section-heading">{"Send Your Feedback"}</h2>

                    <form class="contact__form" onsubmit={onsubmit}>
                        <div class="contact__field">
                            <input
                                type="text"
                                name="name"
                                placeholder="Your Name"
                                value={draft.name.clone()}
                                oninput={on_name}
                            />
                            if errors.name {
                                <p class="contact__field-error">{"Name is required"}</p>
                            }
                        </div>

                        <div class="contact__field">
                            <input
                                type="email"
                                name="email"
                                placeholder="Your Email"
                                value={draft.email.clone()}
                                oninput={on_email}
                            />
                            if errors.email {
                                <p class="contact__field-error">{"Email is required"}</p>
                            }
                        </div>

                        <div class="contact__field">
                            <textarea
                                name="feedback"
                                rows="4"
                                placeholder="Write your feedback here..."
                                value={draft.feedback.clone()}
                                oninput={on_feedback}
                            />
                            if errors.feedback {
                                <p class="contact__field-error">{"Feedback is required"}</p>
                            }
                        </div>

                        if let Some((status_class, message)) = status_line {
                            <p class={classes!("contact__status", status_class)}>{message}</p>
                        }

                        <button
                            class="contact__submit"
                            type="submit"
                            disabled={*status == SubmitStatus::Sending}
                        >
                            { if *status == SubmitStatus::Sending { "Sending..." } else { "Submit Feedback" } }
                        </button>
                    </form>
                </div>
            </div>
        </section>
    }
}

#[function_component(Footer)]
fn footer() -> Html {
    let year = js_sys::Date::new_0().get_full_year();

    html! {
        <footer class="footer">
            <div class="footer__glow footer__glow--blue" aria-hidden="true"></div>
            <div class="footer__glow footer__glow--green" aria-hidden="true"></div>

            <div class="footer__content">
                <h2 class="footer__name">{"Sujay Bote"}</h2>
                <div class="footer__divider" aria-hidden="true"></div>

                <div class="footer__socials">
                    { for SOCIALS.iter().map(|social| html! {
                        <a
                            class="social-pill"
                            href={social.href}
                            target="_blank"
                            rel="noopener noreferrer"
                            aria-label={social.label}
                        >
                            {social.glyph}
                        </a>
                    }) }
                </div>

                <p class="footer__quote">
                    {"\"Dream big, work hard, and let your actions speak louder than your fears.\""}
                </p>
                <p class="footer__copyright">
                    {format!("© {year} Sujay Bote. All rights reserved.")}
                </p>
            </div>
        </footer>
    }
}

#[function_component(App)]
fn app() -> Html {
    let intro_done = use_state_eq(|| false);

    let on_finish = {
        let intro_done = intro_done.clone();
        Callback::from(move |_| intro_done.set(true))
    };

    html! {
        if !*intro_done {
            <IntroAnimation {on_finish} />
        } else {
            <div class="page">
                <CustomCursor />
                <Navbar />
                <Home />
                <About />
                <Skills />
                <Projects />
                <Experience />
                <Testimonials />
                <Contact />
                <Footer />
            </div>
        }
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
