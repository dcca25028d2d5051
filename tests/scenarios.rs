use std::sync::Arc;

use nightsong_giveaways::commands::{CommandContext, CommandHandler, CommandOutput};
use nightsong_giveaways::error::Error;
use nightsong_giveaways::giveaway::models::{
    GiveawayId, GiveawayState, ObjectState, ObjectType, Participant, RollPolicy,
};
use nightsong_giveaways::storage::MemoryStorage;
use nightsong_giveaways::{Config, GiveawayManager};

fn manager() -> GiveawayManager {
    GiveawayManager::with_storage(Arc::new(MemoryStorage::new()), RollPolicy::Random)
}

// Creates the started "Holiday Drop" giveaway with two keys, joined by alice.
fn holiday_drop(manager: &GiveawayManager) -> GiveawayId {
    let id = manager.registry().create("Holiday Drop").unwrap().id();
    manager.inventory().add(id, "CODE1", ObjectType::Key).unwrap();
    manager.inventory().add(id, "CODE2", ObjectType::Key).unwrap();
    manager.registry().start(id).unwrap();
    manager.registry().join(id, &Participant::new(1, "alice")).unwrap();
    id
}

#[test]
fn holiday_drop_roll_leaves_one_reward_pending() {
    let manager = manager();
    let id = holiday_drop(&manager);

    let rolled = manager.allocator().roll(id, &Participant::new(1, "alice")).unwrap();

    let rewards = manager.inventory().list(id).unwrap();
    assert_eq!(rewards.len(), 2);
    for reward in rewards.iter() {
        match reward.id() == rolled.id() {
            true => assert_eq!(reward.object_state(), ObjectState::Pending),
            false => assert_eq!(reward.object_state(), ObjectState::Unused),
        }
    }
}

#[test]
fn finish_waits_for_pending_rewards() {
    let manager = manager();
    let id = holiday_drop(&manager);
    let rolled = manager.allocator().roll(id, &Participant::new(1, "alice")).unwrap();

    let result = manager.registry().finish(id);
    assert!(matches!(result, Err(Error::InvalidTransition(_))));
    assert_eq!(manager.registry().get(id).unwrap().state(), GiveawayState::Started);

    manager.allocator().confirm(rolled.id()).unwrap();
    let finished = manager.registry().finish(id).unwrap();
    assert_eq!(finished.state(), GiveawayState::Finished);

    // Finished giveaways stay listed, but nothing can happen to them anymore.
    assert_eq!(manager.registry().list().unwrap(), vec![finished]);
    assert!(matches!(
        manager.registry().start(id),
        Err(Error::InvalidTransition(_))
    ));
    assert!(matches!(
        manager.allocator().roll(id, &Participant::new(1, "alice")),
        Err(Error::InvalidTransition(_))
    ));
}

#[test]
fn roll_without_joining_is_rejected() {
    let manager = manager();
    let id = holiday_drop(&manager);

    let result = manager.allocator().roll(id, &Participant::new(2, "bob"));
    assert!(matches!(result, Err(Error::NotJoined(_))));
    assert!(
        manager
            .inventory()
            .list(id)
            .unwrap()
            .iter()
            .all(|reward| reward.object_state() == ObjectState::Unused)
    );
}

#[test]
fn denied_reward_can_be_rolled_again() {
    let manager = manager();
    let id = manager.registry().create("single key").unwrap().id();
    manager.inventory().add(id, "CODE1", ObjectType::Key).unwrap();
    manager.registry().start(id).unwrap();
    let alice = Participant::new(1, "alice");
    manager.registry().join(id, &alice).unwrap();

    let first = manager.allocator().roll(id, &alice).unwrap();
    manager.allocator().deny(first.id()).unwrap();
    let second = manager.allocator().roll(id, &alice).unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(second.object_state(), ObjectState::Pending);
}

#[test]
fn joining_twice_keeps_one_participant() {
    let manager = manager();
    let id = holiday_drop(&manager);

    // Same user id under a new name is still the same participant.
    let result = manager.registry().join(id, &Participant::new(1, "alice-renamed"));
    assert!(matches!(result, Err(Error::DuplicateParticipant(_))));
    assert_eq!(manager.registry().get(id).unwrap().participants().len(), 1);
}

#[test]
fn deactivated_giveaway_can_be_resumed() {
    let manager = manager();
    let id = holiday_drop(&manager);
    let alice = Participant::new(1, "alice");

    manager.registry().deactivate(id).unwrap();
    assert!(matches!(
        manager.allocator().roll(id, &alice),
        Err(Error::InvalidTransition(_))
    ));
    assert!(matches!(
        manager.registry().join(id, &Participant::new(2, "bob")),
        Err(Error::InvalidTransition(_))
    ));

    manager.registry().start(id).unwrap();
    assert!(manager.allocator().roll(id, &alice).is_ok());
}

#[test]
fn console_session_through_the_command_handler() {
    let handler = CommandHandler::new(manager(), &Config::default());
    let owner = CommandContext::new(Participant::new(100, "owner"));
    let alice = CommandContext::new(Participant::new(1, "alice"));
    let bob = CommandContext::new(Participant::new(2, "bob"));

    for line in [
        "!gcreate Holiday Drop",
        "!gadd 1 CODE1 [Store] -> Some game",
        "!gadd 1 CODE2 [Store] -> Another game",
        "!gstart 1",
    ] {
        handler.execute(&owner, line).unwrap();
    }
    handler.execute(&alice, "!gjoin 1").unwrap();

    assert!(matches!(
        handler.execute(&bob, "!groll 1"),
        Err(Error::NotJoined(_))
    ));

    let rolled = match handler.execute(&alice, "!groll 1").unwrap() {
        CommandOutput::Reward(reward) => reward,
        output => panic!("unexpected output: {:?}", output),
    };
    assert_eq!(rolled.object_info(), Some("[Store]"));

    assert!(matches!(
        handler.execute(&owner, "!gfinish 1"),
        Err(Error::InvalidTransition(_))
    ));
}
