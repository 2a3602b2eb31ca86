//! Quest-broker wire packets (spec.md §6): `SMSG_QUESTGIVER_QUEST_DETAILS`,
//! `SMSG_QUESTGIVER_OFFER_REWARD`, `SMSG_QUEST_QUERY_RESPONSE`. Pure
//! boundary artifacts — concatenated little-endian scalars and
//! length-prefixed strings in a fixed order, same as
//! [`crate::packet::questgiver_quest_list_packet`]. Gameplay rule
//! correctness (which quests are offered, reward selection) stays out of
//! scope; these functions only encode bytes from caller-supplied data.

use core::types::Guid;
use core::{push_length_prefixed_string, write_u32, write_u64, write_u8};

/// A reward item line shared by quest details and the reward offer.
#[derive(Debug, Clone)]
pub struct RewardItem {
    pub entry: u32,
    pub count: u32,
}

/// `SMSG_QUESTGIVER_QUEST_DETAILS`: `{giverGuid:u64, questEntry:u32,
/// title:lp-string, details:lp-string, objectives:lp-string,
/// rewardXp:u32, rewardMoney:u32, rewardCount:u8, [{entry, count}]}`.
pub fn questgiver_quest_details_packet(
    giver_guid: Guid,
    quest_entry: u32,
    title: &str,
    details: &str,
    objectives: &str,
    reward_xp: u32,
    reward_money: u32,
    rewards: &[RewardItem],
) -> Vec<u8> {
    let mut buf = Vec::new();
    write_u64!(buf, giver_guid.raw());
    write_u32!(buf, quest_entry);
    push_length_prefixed_string(&mut buf, title);
    push_length_prefixed_string(&mut buf, details);
    push_length_prefixed_string(&mut buf, objectives);
    write_u32!(buf, reward_xp);
    write_u32!(buf, reward_money);
    write_u8!(buf, rewards.len() as u8);
    for r in rewards {
        write_u32!(buf, r.entry);
        write_u32!(buf, r.count);
    }
    buf
}

/// `SMSG_QUESTGIVER_OFFER_REWARD`: `{giverGuid:u64, questEntry:u32,
/// title:lp-string, rewardMoney:u32, chooseCount:u8, [{entry, count}]}`.
pub fn questgiver_offer_reward_packet(
    giver_guid: Guid,
    quest_entry: u32,
    title: &str,
    reward_money: u32,
    choices: &[RewardItem],
) -> Vec<u8> {
    let mut buf = Vec::new();
    write_u64!(buf, giver_guid.raw());
    write_u32!(buf, quest_entry);
    push_length_prefixed_string(&mut buf, title);
    write_u32!(buf, reward_money);
    write_u8!(buf, choices.len() as u8);
    for c in choices {
        write_u32!(buf, c.entry);
        write_u32!(buf, c.count);
    }
    buf
}

/// `SMSG_QUEST_QUERY_RESPONSE`: `{questEntry:u32, title:lp-string,
/// objectives:lp-string, rewardXp:u32, rewardMoney:u32}`.
pub fn quest_query_response_packet(
    quest_entry: u32,
    title: &str,
    objectives: &str,
    reward_xp: u32,
    reward_money: u32,
) -> Vec<u8> {
    let mut buf = Vec::new();
    write_u32!(buf, quest_entry);
    push_length_prefixed_string(&mut buf, title);
    push_length_prefixed_string(&mut buf, objectives);
    write_u32!(buf, reward_xp);
    write_u32!(buf, reward_money);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::types::HighGuid;

    #[test]
    fn quest_details_packet_leads_with_giver_guid_and_entry() {
        let giver = Guid::tagged(HighGuid::Unit, 10);
        let packet = questgiver_quest_details_packet(giver, 5, "Rats", "Kill rats", "0/5 rats", 100, 50, &[]);
        assert_eq!(&packet[0..8], &giver.raw().to_le_bytes());
        assert_eq!(&packet[8..12], &5u32.to_le_bytes());
    }

    #[test]
    fn offer_reward_packet_encodes_choice_count() {
        let giver = Guid::tagged(HighGuid::Unit, 10);
        let choices = vec![RewardItem { entry: 1, count: 1 }, RewardItem { entry: 2, count: 1 }];
        let packet = questgiver_offer_reward_packet(giver, 5, "Rats", 50, &choices);
        // giver(8) + entry(4) + title lp-string("Rats\0" len-prefixed: 4 + 5) + money(4) + count(1)
        let title_region_len = 4 + "Rats\0".len();
        let count_offset = 8 + 4 + title_region_len + 4;
        assert_eq!(packet[count_offset], 2);
    }

    #[test]
    fn quest_query_response_has_no_guid_prefix() {
        let packet = quest_query_response_packet(5, "Rats", "0/5 rats", 100, 50);
        assert_eq!(&packet[0..4], &5u32.to_le_bytes());
    }
}
