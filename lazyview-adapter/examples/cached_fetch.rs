// Example: two consumers sharing one cache; the second resolution is served from memory.
use lazyview::RequestDescriptor;
use lazyview_adapter::{FetchCoordinator, shared_cache};

fn main() {
    let cache = shared_cache::<Vec<u32>>(16);
    let dashboard: FetchCoordinator<Vec<u32>, String> = FetchCoordinator::new(cache.clone());
    let sidebar: FetchCoordinator<Vec<u32>, String> = FetchCoordinator::new(cache.clone());

    let _sub = dashboard.subscribe(|state| println!("dashboard -> {:?}", state.status()));

    let request = RequestDescriptor::new("/api/insights").with_param("range", "30d");
    let state = pollster::block_on(dashboard.resolve_request(&request, || async {
        println!("retrieving {}", request.cache_key());
        Ok(vec![3, 1, 4])
    }));
    println!("dashboard: {state:?}");

    let state = pollster::block_on(sidebar.resolve_request(&request, || async {
        Err("not reached: served from cache".to_string())
    }));
    println!("sidebar: {state:?}, cached entries={}", cache.borrow().len());
}
