#![no_main]

use arbitrary::Arbitrary;
use collnotify_core::{EventAction, MutationAction, SuspensionContext, SuspensionMode};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    mode: u8,
    records: Vec<(u8, Option<u8>, bool)>,
}

fuzz_target!(|input: Input| {
    let Ok(mode) = SuspensionMode::try_from(input.mode % 6) else {
        return;
    };

    let mut ctx = SuspensionContext::open(mode);
    for &(item, index, is_add) in input.records.iter().take(512) {
        let action = if is_add {
            MutationAction::Add
        } else {
            MutationAction::Remove
        };
        // Homogeneous modes only ever see their own action.
        let action = mode.homogeneous_action().unwrap_or(action);
        ctx.record(item, index.map(usize::from), action);
    }
    let recorded = ctx.len();
    let events = ctx.close();

    for event in &events {
        assert_eq!(event.items().len(), event.indices().len());
        if event.action() == EventAction::MixedSequence {
            assert_eq!(event.actions().len(), event.items().len());
        }
    }

    let carried: usize = events.iter().map(|e| e.len()).sum();
    match mode {
        SuspensionMode::None => assert_eq!(events.len(), 1),
        SuspensionMode::MixedConsolidate => {
            assert!(events.len() <= 2);
            assert!(carried <= recorded);
            assert_eq!((recorded - carried) % 2, 0);
        }
        _ => assert_eq!(carried, recorded),
    }
});
