// Example: render only the visible slice of a long list.
use lazyview::{LazyViewOptions, WindowedList, compute_visible_range, total_extent};

fn main() {
    let rows: Vec<String> = (0..1_000).map(|i| format!("goal #{i}")).collect();
    let list = WindowedList::from_options(&LazyViewOptions::new()).unwrap();

    println!("total_extent={}", list.total_extent(rows.len()));
    for (item, row) in list.slice(505, &rows) {
        println!("top={:>6} height={} {row}", item.offset, item.height);
    }

    // The free functions compute the same window without a list object.
    let viewport = list.viewport(505, rows.len());
    println!("range={:?}", compute_visible_range(viewport, list.overscan()));
    println!("extent={}", total_extent(rows.len(), list.item_height()));
}
