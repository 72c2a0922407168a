// Example: debounce keystrokes and throttle scroll offsets on a simulated clock.
use lazyview::{Debounce, Throttle};

fn main() {
    let mut query = Debounce::new(String::new(), 300).unwrap();
    for (now, text) in [(0, "g"), (80, "go"), (150, "goa"), (210, "goal")] {
        query.set(text.to_string(), now);
    }
    for now in (0..=600).step_by(100) {
        if query.tick(now) {
            println!("{now:>4}ms search {:?}", query.value());
        }
    }

    let mut scroll = Throttle::new(0u64, 200, 0).unwrap();
    for now in (0..=1_000).step_by(50) {
        let fired = scroll.set(now * 3, now) || scroll.tick(now);
        if fired {
            println!("{now:>4}ms scroll offset {}", scroll.value());
        }
    }
}
