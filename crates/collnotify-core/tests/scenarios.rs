use collnotify_core::{
    BatchChangeEvent, EventAction, MutationAction, ScopeTable, SuspendError, SuspensionContext,
    SuspensionMode,
};

fn close_with(
    mode: SuspensionMode,
    records: &[(&'static str, usize, MutationAction)],
) -> Vec<BatchChangeEvent<&'static str>> {
    let mut ctx = SuspensionContext::open(mode);
    for &(item, index, action) in records {
        ctx.record(item, Some(index), action);
    }
    ctx.close()
}

#[test]
fn bash_groups_adds_then_removes() {
    use MutationAction::{Add, Remove};
    let events = close_with(
        SuspensionMode::MixedBash,
        &[("x0", 0, Add), ("x1", 1, Add), ("x0", 0, Remove), ("x1", 1, Remove)],
    );

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action(), EventAction::Add);
    assert_eq!(events[0].items(), &["x0", "x1"]);
    assert_eq!(events[0].indices(), &[Some(0), Some(1)]);
    assert_eq!(events[1].action(), EventAction::Remove);
    assert_eq!(events[1].items(), &["x0", "x1"]);
    assert_eq!(events[1].indices(), &[Some(0), Some(1)]);
}

#[test]
fn consolidate_full_cancellation() {
    use MutationAction::{Add, Remove};
    let events = close_with(
        SuspensionMode::MixedConsolidate,
        &[("y", 2, Add), ("y", 2, Remove)],
    );
    assert!(events.is_empty());
}

#[test]
fn consolidate_partial_cancellation() {
    use MutationAction::{Add, Remove};
    let events = close_with(
        SuspensionMode::MixedConsolidate,
        &[("a", 0, Add), ("b", 1, Add), ("a", 0, Remove)],
    );
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action(), EventAction::Add);
    assert_eq!(events[0].items(), &["b"]);
    assert_eq!(events[0].indices(), &[Some(1)]);
}

#[test]
fn none_mode_always_resets() {
    use MutationAction::{Add, Remove};
    let events = close_with(
        SuspensionMode::None,
        &[("a", 0, Add), ("b", 3, Remove), ("c", 1, Add)],
    );
    assert_eq!(events, vec![BatchChangeEvent::reset()]);
    assert!(events[0].items().is_empty());
    assert!(events[0].indices().is_empty());
}

#[test]
fn adding_mode_is_verbatim() {
    use MutationAction::Add;
    let events = close_with(SuspensionMode::Adding, &[("p", 0, Add), ("q", 1, Add)]);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action(), EventAction::Add);
    assert_eq!(events[0].items(), &["p", "q"]);
    assert_eq!(events[0].indices(), &[Some(0), Some(1)]);
}

#[test]
fn scope_table_follows_same_policies() {
    let mut table = ScopeTable::new();
    let scope = table.open_scope(SuspensionMode::MixedConsolidate);
    table.record(scope, "a", Some(0), MutationAction::Add).unwrap();
    table.record(scope, "b", Some(1), MutationAction::Add).unwrap();
    table.record(scope, "a", Some(0), MutationAction::Remove).unwrap();

    let events = table.close_scope(scope).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].items(), &["b"]);

    assert_eq!(
        table.close_scope(scope),
        Err(SuspendError::NullContext(scope))
    );
}

#[test]
fn mode_names_from_host_configuration() {
    let mode: SuspensionMode = "MixedConsolidate".parse().unwrap();
    assert!(mode.is_mixed());
    assert!(matches!(
        "Replacing".parse::<SuspensionMode>(),
        Err(SuspendError::UnhandledMode(_))
    ));
}
