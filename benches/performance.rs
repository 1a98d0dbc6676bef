//! Performance benchmarks for reader streams.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reader_streams::{
    get_next_item, reduce, PostKey, StreamAction, StreamStore, StreamStoreConfig, StreamsState,
};

fn page(start: u64, len: u64) -> StreamAction {
    StreamAction::PageReceived {
        stream_key: "following".into(),
        posts: (start..start + len).map(|id| PostKey::blog(id, 1)).collect(),
        page_handle: None,
    }
}

fn state_with_items(count: u64) -> StreamsState {
    let config = StreamStoreConfig::default();
    (0..count / 20).fold(StreamsState::new(), |state, i| {
        reduce(state, &page(i * 20, 20), &config)
    })
}

/// Benchmark appending a page to streams of varying length
fn bench_page_received(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_received");
    let config = StreamStoreConfig::default();

    for existing in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("existing_items", existing),
            &existing,
            |b, &existing| {
                let state = state_with_items(existing);
                let action = page(existing - 10, 20);
                b.iter(|| black_box(reduce(state.clone(), &action, &config)));
            },
        );
    }

    group.finish();
}

/// Benchmark keyboard navigation lookups
fn bench_navigation(c: &mut Criterion) {
    let mut state = state_with_items(1000);
    state.current_stream = Some("following".into());
    let last = PostKey::blog(998, 1);

    c.bench_function("get_next_item_tail", |b| {
        b.iter(|| black_box(get_next_item(&state, &last)));
    });
}

/// Benchmark dispatch through the locked store
fn bench_store_dispatch(c: &mut Criterion) {
    let store = StreamStore::new(StreamStoreConfig::default()).unwrap();
    store.dispatch(page(0, 100));

    c.bench_function("store_dispatch_request", |b| {
        b.iter(|| {
            store.dispatch(StreamAction::PageRequested {
                stream_key: "following".into(),
            })
        });
    });
}

criterion_group!(benches, bench_page_received, bench_navigation, bench_store_dispatch);
criterion_main!(benches);
