// Example: drive a list controller from a burst of scroll events and a frame tick.
use lazyview::LazyViewOptions;
use lazyview_adapter::{DeferredImage, ListController};

fn main() {
    let opts = LazyViewOptions::new();
    let mut list = ListController::from_options(&opts, 10_000, 0).unwrap();

    for frame in 0..30u64 {
        let now = frame * 16;
        list.on_scroll(frame * 120, now);
        if list.tick(now) {
            println!("{now:>4}ms range={:?}", list.visible_range());
        }
    }
    if let Some(deadline) = list.next_deadline_ms() {
        list.tick(deadline);
        println!("{deadline:>4}ms range={:?} (trailing)", list.visible_range());
    }

    let mut hero = DeferredImage::from_options("hero", "/images/hero.jpg", &opts).unwrap();
    for ratio in [0.0, 0.05, 0.3, 1.0] {
        if hero.on_intersection(ratio) {
            println!("load {:?} at ratio {ratio}", hero.src_to_load());
        }
    }
    hero.mark_loaded();
    println!("placeholder={}", hero.shows_placeholder());
}
