use crate::*;

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::future::Future;
use core::pin::{Pin, pin};
use core::task::{Context, Poll};

use lazyview::{
    ConfigError, FetchState, FetchStatus, LazyViewOptions, RequestDescriptor, VisibleRange,
    WindowedList,
};

/// A retrieval whose result is supplied by the test after the fact.
#[derive(Clone)]
struct Gate<T>(Rc<RefCell<Option<T>>>);

impl<T> Gate<T> {
    fn new() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    fn open(&self, value: T) {
        *self.0.borrow_mut() = Some(value);
    }

    fn wait(&self) -> GateFuture<T> {
        GateFuture(Rc::clone(&self.0))
    }
}

struct GateFuture<T>(Rc<RefCell<Option<T>>>);

impl<T> Future for GateFuture<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<T> {
        match self.0.borrow_mut().take() {
            Some(value) => Poll::Ready(value),
            None => Poll::Pending,
        }
    }
}

fn poll_once<F: Future>(fut: Pin<&mut F>) -> Poll<F::Output> {
    let mut cx = Context::from_waker(futures_task::noop_waker_ref());
    fut.poll(&mut cx)
}

type Coordinator = FetchCoordinator<u32, String>;

type Retrieval = core::future::Ready<Result<u32, String>>;

fn counted_ok(calls: &Rc<Cell<u32>>, value: u32) -> impl FnOnce() -> Retrieval {
    let calls = Rc::clone(calls);
    move || {
        calls.set(calls.get() + 1);
        core::future::ready(Ok(value))
    }
}

fn counted_err(calls: &Rc<Cell<u32>>) -> impl FnOnce() -> Retrieval {
    let calls = Rc::clone(calls);
    move || {
        calls.set(calls.get() + 1);
        core::future::ready(Err("boom".to_string()))
    }
}

#[test]
fn cache_hit_skips_retrieval() {
    let cache = shared_cache(4);
    cache.borrow_mut().set("metrics", 1);
    let coord = Coordinator::new(Rc::clone(&cache));
    let calls = Rc::new(Cell::new(0));

    let state = pollster::block_on(coord.resolve("metrics", counted_ok(&calls, 99)));

    assert_eq!(state, FetchState::Success(1));
    assert_eq!(calls.get(), 0);
    assert_eq!(coord.status(), FetchStatus::Success);
}

#[test]
fn miss_retrieves_and_caches_success() {
    let cache = shared_cache(4);
    let coord = Coordinator::new(Rc::clone(&cache));
    assert_eq!(coord.state(), FetchState::Idle);
    let calls = Rc::new(Cell::new(0));

    let state = pollster::block_on(coord.resolve("insights", counted_ok(&calls, 5)));

    assert_eq!(state, FetchState::Success(5));
    assert_eq!(calls.get(), 1);
    assert_eq!(coord.data(), Some(5));
    assert_eq!(coord.error(), None);
    assert_eq!(coord.current_key().as_deref(), Some("insights"));
    assert_eq!(cache.borrow().get("insights"), Some(&5));
}

#[test]
fn failures_are_never_cached_and_successes_are_reused() {
    let cache = shared_cache(4);
    let coord = Coordinator::new(Rc::clone(&cache));
    let calls = Rc::new(Cell::new(0));

    for _ in 0..2 {
        let state = pollster::block_on(coord.resolve("k", counted_err(&calls)));
        assert_eq!(state, FetchState::Failed("boom".to_string()));
        assert!(!cache.borrow().has("k"));
    }
    assert_eq!(calls.get(), 2, "each failed resolution retries");
    assert_eq!(coord.error().as_deref(), Some("boom"));

    let state = pollster::block_on(coord.resolve("k", counted_ok(&calls, 42)));
    assert_eq!(state, FetchState::Success(42));
    assert_eq!(calls.get(), 3);

    let state = pollster::block_on(coord.resolve("k", counted_err(&calls)));
    assert_eq!(state, FetchState::Success(42));
    assert_eq!(calls.get(), 3, "cached value served without retrieving");
}

#[test]
fn loading_is_observable_while_retrieval_is_in_flight() {
    let coord = Coordinator::new(shared_cache(4));
    let gate = Gate::new();

    let mut fut = pin!(coord.resolve("slow", || gate.wait()));
    assert!(poll_once(fut.as_mut()).is_pending());
    assert_eq!(coord.status(), FetchStatus::Loading);
    assert!(coord.with_state(FetchState::is_loading));

    gate.open(Ok(7));
    assert_eq!(poll_once(fut.as_mut()), Poll::Ready(FetchState::Success(7)));
    assert_eq!(coord.data(), Some(7));
}

#[test]
fn disposed_coordinator_discards_late_results() {
    let cache = shared_cache(4);
    let coord = Coordinator::new(Rc::clone(&cache));
    let gate = Gate::new();

    let mut fut = pin!(coord.resolve("late", || gate.wait()));
    assert!(poll_once(fut.as_mut()).is_pending());

    coord.dispose();
    coord.dispose();
    gate.open(Ok(9));

    assert_eq!(poll_once(fut.as_mut()), Poll::Ready(FetchState::Loading));
    assert_eq!(coord.status(), FetchStatus::Loading);
    assert!(coord.is_disposed());
    assert!(!cache.borrow().has("late"));
}

#[test]
fn dropped_coordinator_discards_late_results() {
    let cache = shared_cache(4);
    let coord = Coordinator::new(Rc::clone(&cache));
    let gate = Gate::new();
    let statuses = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&statuses);
    let _sub = coord.subscribe(move |s| sink.borrow_mut().push(s.status()));

    let fut = coord.resolve("late", || gate.wait());
    let mut fut = pin!(fut);
    assert!(poll_once(fut.as_mut()).is_pending());
    drop(coord);

    gate.open(Ok(1));
    assert!(poll_once(fut.as_mut()).is_ready());
    assert!(!cache.borrow().has("late"));
    assert_eq!(*statuses.borrow(), vec![FetchStatus::Loading]);
}

#[test]
fn resolve_after_dispose_does_not_retrieve() {
    let coord = Coordinator::new(shared_cache(4));
    let calls = Rc::new(Cell::new(0));
    coord.dispose();

    let state = pollster::block_on(coord.resolve("k", counted_ok(&calls, 1)));
    assert_eq!(state, FetchState::Idle);
    assert_eq!(calls.get(), 0);
}

#[test]
fn concurrent_resolutions_are_not_deduplicated() {
    let cache = shared_cache(4);
    let first = Coordinator::new(Rc::clone(&cache));
    let second = Coordinator::new(Rc::clone(&cache));
    let (gate_a, gate_b) = (Gate::new(), Gate::new());
    let calls = Rc::new(Cell::new(0));

    let (ca, cb) = (Rc::clone(&calls), Rc::clone(&calls));
    let mut fut_a = pin!(first.resolve("shared", || {
        ca.set(ca.get() + 1);
        gate_a.wait()
    }));
    let mut fut_b = pin!(second.resolve("shared", || {
        cb.set(cb.get() + 1);
        gate_b.wait()
    }));

    assert!(poll_once(fut_a.as_mut()).is_pending());
    assert!(poll_once(fut_b.as_mut()).is_pending());
    assert_eq!(calls.get(), 2);

    // Completion order decides which write the cache keeps.
    gate_b.open(Ok(2));
    assert_eq!(poll_once(fut_b.as_mut()), Poll::Ready(FetchState::Success(2)));
    gate_a.open(Ok(1));
    assert_eq!(poll_once(fut_a.as_mut()), Poll::Ready(FetchState::Success(1)));
    assert_eq!(cache.borrow().get("shared"), Some(&1));
}

#[test]
fn superseded_resolution_does_not_overwrite_newer_state() {
    let cache = shared_cache(4);
    let coord = Coordinator::new(Rc::clone(&cache));
    let gate = Gate::new();
    let calls = Rc::new(Cell::new(0));

    let mut old = pin!(coord.resolve("a", || gate.wait()));
    assert!(poll_once(old.as_mut()).is_pending());

    let state = pollster::block_on(coord.resolve("b", counted_ok(&calls, 20)));
    assert_eq!(state, FetchState::Success(20));

    gate.open(Ok(10));
    assert_eq!(poll_once(old.as_mut()), Poll::Ready(FetchState::Success(20)));
    assert_eq!(coord.current_key().as_deref(), Some("b"));
    // The late value is still good data for whoever asks for "a" next.
    assert_eq!(cache.borrow().get("a"), Some(&10));
}

#[test]
fn subscription_sees_transitions_until_cancelled() {
    let coord = Coordinator::new(shared_cache(4));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut sub = coord.subscribe(move |s| sink.borrow_mut().push(s.clone()));
    assert!(sub.is_active());

    pollster::block_on(coord.resolve("x", || async { Ok(3) }));
    pollster::block_on(coord.resolve("x", || async { Ok(4) }));
    assert_eq!(
        *seen.borrow(),
        vec![
            FetchState::Loading,
            FetchState::Success(3),
            FetchState::Success(3),
        ]
    );

    sub.cancel();
    sub.cancel();
    assert!(!sub.is_active());
    pollster::block_on(coord.resolve("y", || async { Err("nope".to_string()) }));
    assert_eq!(seen.borrow().len(), 3);
    assert_eq!(coord.error().as_deref(), Some("nope"));
}

#[test]
fn dropping_subscription_unregisters_listener() {
    let coord = Coordinator::new(shared_cache(4));
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    {
        let _sub = coord.subscribe(move |_| counter.set(counter.get() + 1));
        pollster::block_on(coord.resolve("x", || async { Ok(1) }));
    }
    pollster::block_on(coord.resolve("z", || async { Ok(2) }));
    assert_eq!(hits.get(), 2);
}

#[test]
fn cancel_inside_state_callback_unregisters_listener() {
    let coord = Coordinator::new(shared_cache(4));
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let mut sub = coord.subscribe(move |_| counter.set(counter.get() + 1));

    coord.with_state(|_| sub.cancel());
    assert!(!sub.is_active());

    pollster::block_on(coord.resolve("x", || async { Ok(1) }));
    assert_eq!(hits.get(), 0);
}

#[test]
fn coordinator_can_be_reentered_from_state_callback() {
    let cache = shared_cache(4);
    let coord = Coordinator::new(Rc::clone(&cache));
    let sub = coord.with_state(|state| {
        assert_eq!(*state, FetchState::Idle);
        let sub = coord.subscribe(|_| {});
        pollster::block_on(coord.resolve("inner", || async { Ok(2) }));
        sub
    });
    assert!(sub.is_active());
    assert_eq!(cache.borrow().get("inner"), Some(&2));

    coord.with_state(|_| coord.dispose());
    assert!(coord.is_disposed());
    assert!(!sub.is_active());
}

#[test]
fn listener_may_cancel_a_later_listener_mid_notification() {
    let coord = Coordinator::new(shared_cache(4));
    let hits = Rc::new(Cell::new(0));
    let victim: Rc<RefCell<Option<Subscription<u32, String>>>> = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&victim);
    let _first = coord.subscribe(move |_| {
        if let Some(sub) = slot.borrow_mut().as_mut() {
            sub.cancel();
        }
    });
    let counter = Rc::clone(&hits);
    *victim.borrow_mut() = Some(coord.subscribe(move |_| counter.set(counter.get() + 1)));

    pollster::block_on(coord.resolve("x", || async { Ok(1) }));
    assert_eq!(hits.get(), 0);
    assert_eq!(victim.borrow().as_ref().map(Subscription::is_active), Some(false));
}

#[test]
fn listener_may_dispose_its_coordinator() {
    let coord = Rc::new(Coordinator::new(shared_cache(4)));
    let statuses = Rc::new(RefCell::new(Vec::new()));

    let weak = Rc::downgrade(&coord);
    let sink = Rc::clone(&statuses);
    let _sub = coord.subscribe(move |state| {
        sink.borrow_mut().push(state.status());
        if let Some(coord) = weak.upgrade() {
            coord.dispose();
        }
    });

    let state = pollster::block_on(coord.resolve("x", || async { Ok(1) }));
    assert_eq!(state, FetchState::Loading);
    assert!(coord.is_disposed());
    assert_eq!(*statuses.borrow(), vec![FetchStatus::Loading]);
}

#[test]
fn resolve_request_uses_canonical_key() {
    let cache: SharedCache<u32> = shared_cache_from_options(&LazyViewOptions::new());
    assert_eq!(cache.borrow().capacity(), 100);
    let coord = Coordinator::new(Rc::clone(&cache));
    let request = RequestDescriptor::new("/api/goals")
        .with_param("user", "7")
        .with_param("status", "open");

    pollster::block_on(coord.resolve_request(&request, || async { Ok(11) }));

    assert_eq!(
        coord.current_key().as_deref(),
        Some("/api/goals?status=open&user=7")
    );
    assert_eq!(cache.borrow().get(&request.cache_key()), Some(&11));
}

#[test]
fn zero_capacity_cache_always_retrieves() {
    let coord = Coordinator::new(shared_cache(0));
    let calls = Rc::new(Cell::new(0));
    for _ in 0..3 {
        let state = pollster::block_on(coord.resolve("k", counted_ok(&calls, 1)));
        assert_eq!(state, FetchState::Success(1));
    }
    assert_eq!(calls.get(), 3);
}

#[test]
fn list_controller_defaults_from_options() {
    let c = ListController::from_options(&LazyViewOptions::new(), 1000, 0).unwrap();
    assert_eq!(c.total_extent(), 50_000);
    assert_eq!(c.visible_range(), VisibleRange { start_index: 0, end_index: 9 });
    assert_eq!(c.items().len(), 9);
}

#[test]
fn list_controller_throttles_scroll_updates() {
    let list = WindowedList::new(50, 400).unwrap();
    let mut c = ListController::new(list, 1000, 200, 0).unwrap();

    assert!(!c.on_scroll(100, 10));
    assert!(!c.on_scroll(505, 20));
    assert_eq!(c.visible_range().start_index, 0);
    assert_eq!(c.next_deadline_ms(), Some(200));

    assert!(!c.tick(199));
    assert!(c.tick(200));
    assert_eq!(c.scroll_offset(), 505);
    assert_eq!(c.visible_range(), VisibleRange { start_index: 10, end_index: 19 });

    // A full window later the next scroll applies at once.
    assert!(c.on_scroll(1000, 400));
    assert_eq!(c.visible_range().start_index, 20);

    let mut first = None;
    c.for_each_item(|it| {
        first.get_or_insert(it);
    });
    assert_eq!(first.map(|it| it.offset), Some(1000));
}

#[test]
fn list_controller_clamps_after_shrink_and_resize() {
    let list = WindowedList::new(50, 400).unwrap();
    let mut c = ListController::new(list, 1000, 100, 0).unwrap();
    assert!(c.on_scroll(40_000, 100));
    assert_eq!(c.visible_range().start_index, 800);

    c.set_item_count(5);
    assert_eq!(c.scroll_offset(), 0);
    assert_eq!(c.visible_range(), VisibleRange { start_index: 0, end_index: 5 });

    assert_eq!(c.on_resize(0), Err(ConfigError::ZeroContainerHeight));
    // Growing the list again re-exposes the parked offset, clamped to the new bounds.
    c.set_item_count(100);
    c.on_resize(100).unwrap();
    assert_eq!(c.scroll_offset(), 4_900);
    assert_eq!(c.visible_range(), VisibleRange { start_index: 98, end_index: 100 });
}

#[test]
fn list_controller_cancel_drops_parked_scroll() {
    let list = WindowedList::new(10, 100).unwrap();
    let mut c = ListController::new(list, 100, 50, 0).unwrap();
    c.on_scroll(300, 10);
    assert!(c.is_pending());
    c.cancel();
    assert!(!c.tick(1000));
    assert_eq!(c.scroll_offset(), 0);
}

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn list_controller_range_stays_in_bounds_under_random_events() {
    let mut rng = Lcg(0x5eed);
    let list = WindowedList::new(24, 300).unwrap().with_overscan(2);
    let mut c = ListController::new(list, 500, 16, 0).unwrap();
    let mut now = 0u64;

    for _ in 0..2_000 {
        now += rng.next_u64() % 20;
        match rng.next_u64() % 4 {
            0 => c.set_item_count((rng.next_u64() % 600) as usize),
            1 => c.on_resize(1 + (rng.next_u64() % 800) as u32).unwrap(),
            _ => {
                c.on_scroll(rng.next_u64() % 20_000, now);
            }
        }
        c.tick(now);

        let r = c.visible_range();
        assert!(r.start_index <= r.end_index);
        assert!(r.end_index <= c.item_count());
        assert!(c.scroll_offset() <= c.list().max_scroll_offset(c.item_count()));
    }
}

#[test]
fn deferred_image_withholds_source_until_visible() {
    let mut img = DeferredImage::new("hero", "/images/hero-bg.jpg", 0.1)
        .unwrap()
        .with_alt("hero");
    assert_eq!(img.state(), ImageLoadState::Deferred);
    assert_eq!(img.src_to_load(), None);
    assert!(img.shows_placeholder());
    assert!(!img.mark_loaded());

    assert!(!img.on_intersection(0.05));
    assert_eq!(img.src_to_load(), None);

    assert!(img.on_intersection(0.4));
    assert_eq!(img.state(), ImageLoadState::Loading);
    assert_eq!(img.src_to_load(), Some("/images/hero-bg.jpg"));
    assert!(!img.on_intersection(0.0));
    assert!(!img.on_intersection(1.0));

    assert!(img.mark_loaded());
    assert!(!img.mark_loaded());
    assert!(!img.shows_placeholder());
    assert_eq!(img.alt(), "hero");
    assert_eq!(*img.target(), "hero");
}

#[test]
fn disposed_deferred_image_never_loads() {
    let opts = LazyViewOptions::new();
    let mut img = DeferredImage::from_options(1u32, "/images/logo.png", &opts).unwrap();
    img.dispose();
    assert!(!img.on_intersection(1.0));
    assert_eq!(img.state(), ImageLoadState::Deferred);

    let bad = LazyViewOptions::new().with_visibility_threshold(-1.0);
    assert!(DeferredImage::from_options(1u32, "/x.png", &bad).is_err());
}
