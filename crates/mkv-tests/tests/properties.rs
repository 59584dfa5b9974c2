//! Property tests for the streaming reader.
//!
//! The reader must not care how the input is split: any chunking yields the
//! same elements as a single buffer, and the elements put back together give
//! the input bytes again.

use mkv_parser::ReaderConfig;
use mkv_tests::{
    encode, events, events_chunked, leaf, live_master, live_webm, reconstruct, simple_block,
    uint, webm_header, Event, Node,
};
use mkv_types::matroska::{CLUSTER, SEGMENT, SIMPLE_BLOCK, TIMECODE};
use proptest::prelude::*;

/// Not in the Matroska registry.
const UNREGISTERED_ID: u32 = 0x4FFF;

fn cluster_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..48), 0..6)
}

fn stream_of(clusters: &[Vec<Vec<u8>>], extra: Option<(usize, usize, Vec<u8>)>) -> Vec<u8> {
    let mut segment = Vec::new();
    for (c, frames) in clusters.iter().enumerate() {
        let mut children: Vec<Node> = vec![uint(TIMECODE, c as u64 * 100)];
        for (f, frame) in frames.iter().enumerate() {
            let timecode = i16::try_from(f).unwrap_or(i16::MAX);
            children.push(simple_block(1, timecode, 0x80, frame));
        }
        if let Some((at_cluster, at_child, ref content)) = extra {
            if at_cluster == c {
                let at = at_child.min(children.len());
                children.insert(at, leaf(UNREGISTERED_ID, content.clone()));
            }
        }
        segment.push(live_master(CLUSTER, children));
    }
    encode(&[webm_header(), live_master(SEGMENT, segment)])
}

/// Structural view without element counts.
fn shape(events: &[Event]) -> Vec<(String, Vec<u8>)> {
    events
        .iter()
        .map(|event| match event {
            Event::Start { name, depth, .. } => (format!("+{name}@{depth}"), Vec::new()),
            Event::End { name, depth, .. } => (format!("-{name}@{depth}"), Vec::new()),
            Event::Data {
                name,
                depth,
                content,
                ..
            } => (format!("{name}@{depth}"), content.clone()),
        })
        .collect()
}

// =============================================================================
// Chunking
// =============================================================================

proptest! {
    #[test]
    fn chunking_does_not_change_events(
        clusters in 1usize..4,
        frames in 0usize..5,
        frame_len in 0usize..40,
        chunks in prop::collection::vec(1usize..64, 1..8),
    ) {
        let bytes = live_webm(clusters, frames, frame_len);
        let whole = events(&bytes, ReaderConfig::default()).unwrap();
        let split = events_chunked(&bytes, &chunks, ReaderConfig::default()).unwrap();
        prop_assert_eq!(whole, split);
    }

    #[test]
    fn small_content_chunks_do_not_change_events(
        clusters in cluster_strategy().prop_map(|c| vec![c]),
        max_content_chunk in 1usize..16,
        chunks in prop::collection::vec(1usize..32, 1..4),
    ) {
        let bytes = stream_of(&clusters, None);
        let config = ReaderConfig {
            max_content_chunk,
            ..ReaderConfig::default()
        };
        let whole = events(&bytes, ReaderConfig::default()).unwrap();
        let split = events_chunked(&bytes, &chunks, config).unwrap();
        prop_assert_eq!(whole, split);
    }

    #[test]
    fn events_reconstruct_the_input(
        clusters in prop::collection::vec(cluster_strategy(), 1..4),
        chunks in prop::collection::vec(1usize..64, 1..8),
    ) {
        let bytes = stream_of(&clusters, None);
        let events = events_chunked(&bytes, &chunks, ReaderConfig::default()).unwrap();
        prop_assert_eq!(reconstruct(&events), bytes);
    }
}

// =============================================================================
// Structure
// =============================================================================

proptest! {
    #[test]
    fn starts_and_ends_nest(
        clusters in prop::collection::vec(cluster_strategy(), 0..4),
        chunks in prop::collection::vec(1usize..64, 1..8),
    ) {
        let bytes = stream_of(&clusters, None);
        let events = events_chunked(&bytes, &chunks, ReaderConfig::default()).unwrap();

        let mut open: Vec<(&str, u64)> = Vec::new();
        for event in &events {
            match event {
                Event::Start { name, count, depth, .. } => {
                    prop_assert_eq!(*depth, open.len());
                    open.push((*name, *count));
                }
                Event::Data { depth, .. } => prop_assert_eq!(*depth, open.len()),
                Event::End { name, count, depth } => {
                    let top = open.pop();
                    prop_assert_eq!(top, Some((*name, *count)));
                    prop_assert_eq!(*depth, open.len());
                }
            }
        }
        prop_assert!(open.is_empty(), "unclosed: {open:?}");
    }

    #[test]
    fn counts_increase_in_start_order(
        clusters in prop::collection::vec(cluster_strategy(), 1..4),
    ) {
        let bytes = stream_of(&clusters, None);
        let events = events(&bytes, ReaderConfig::default()).unwrap();
        let counts: Vec<u64> = events
            .iter()
            .filter_map(|event| match event {
                Event::Start { count, .. } | Event::Data { count, .. } => Some(*count),
                Event::End { .. } => None,
            })
            .collect();
        prop_assert!(counts.windows(2).all(|w| w[0] < w[1]), "{counts:?}");
    }

    #[test]
    fn filter_selects_without_renumbering(
        clusters in prop::collection::vec(cluster_strategy(), 1..4),
        chunks in prop::collection::vec(1usize..64, 1..4),
    ) {
        let bytes = stream_of(&clusters, None);
        let all = events(&bytes, ReaderConfig::default()).unwrap();
        let filtered = events_chunked(
            &bytes,
            &chunks,
            ReaderConfig::default().with_filter([SIMPLE_BLOCK]),
        )
        .unwrap();
        let expected: Vec<Event> = all
            .into_iter()
            .filter(|event| event.name() == "SimpleBlock")
            .collect();
        prop_assert_eq!(filtered, expected);
    }

    #[test]
    fn unregistered_elements_are_invisible(
        clusters in prop::collection::vec(cluster_strategy(), 1..3),
        at_cluster in 0usize..3,
        at_child in 0usize..8,
        content in prop::collection::vec(any::<u8>(), 0..32),
        chunks in prop::collection::vec(1usize..64, 1..4),
    ) {
        let plain = stream_of(&clusters, None);
        let with_extra = stream_of(&clusters, Some((at_cluster, at_child, content)));

        let expected = events(&plain, ReaderConfig::default()).unwrap();
        let actual = events_chunked(&with_extra, &chunks, ReaderConfig::default()).unwrap();
        prop_assert_eq!(shape(&actual), shape(&expected));
    }
}
