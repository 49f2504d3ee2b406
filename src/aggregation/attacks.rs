// src/aggregation/attacks.rs

//! Attack list reconciliation.
//!
//! Event list rows are read one by one into [`AttackRow`]s. Rows of the same
//! grouped attack share a union id and are merged into the first record of
//! that union; the merged record is emitted once.

use std::collections::HashMap;

use crate::models::ids::MissionId;
use crate::models::{AttackEvent, Coordinate};

/// One event list row with the flags that decide whether it is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackRow {
    pub event: AttackEvent,
    /// Secondary view of another fleet of a union; merged, never emitted.
    pub partner: bool,
    pub hostile: bool,
    pub friendly: bool,
}

impl AttackRow {
    /// Reported on its own: not a partner view, and hostile or a grouped
    /// attack invitation aimed at one of `own` celestials.
    fn is_reported(&self, own: &[Coordinate]) -> bool {
        if self.partner {
            return false;
        }
        self.hostile
            || (self.friendly
                && self.event.mission_type == MissionId::GroupedAttack
                && own.contains(&self.event.destination))
    }
}

/// Merge union members and keep reported rows, in page order.
pub fn merge(rows: impl IntoIterator<Item = AttackRow>, own: &[Coordinate]) -> Vec<AttackEvent> {
    let mut records: Vec<AttackEvent> = Vec::new();
    let mut unions: HashMap<i64, usize> = HashMap::new();
    let mut reported: Vec<usize> = Vec::new();

    for row in rows {
        let keep = row.is_reported(own);
        let union_id = row.event.union_id;
        let idx = match unions.get(&union_id) {
            Some(&idx) if union_id != 0 => {
                absorb(&mut records[idx], row.event);
                idx
            }
            _ => {
                records.push(row.event);
                let idx = records.len() - 1;
                if union_id != 0 {
                    unions.insert(union_id, idx);
                }
                idx
            }
        };
        if keep && !reported.contains(&idx) {
            reported.push(idx);
        }
    }

    reported.into_iter().map(|idx| records[idx].clone()).collect()
}

/// Fold a union member into the union's first record.
fn absorb(first: &mut AttackEvent, other: AttackEvent) {
    if let Some(ships) = other.ships {
        match first.ships.as_mut() {
            Some(total) => total.add(&ships),
            None => first.ships = Some(ships),
        }
    }
    if first.attacker_id == 0 {
        first.attacker_id = other.attacker_id;
    }
    if first.origin.is_none_or(|o| o.is_zero()) {
        first.origin = other.origin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShipsInfos;

    fn event(union_id: i64, fighters: i64) -> AttackEvent {
        AttackEvent {
            id: 0,
            mission_type: MissionId::GroupedAttack,
            origin: None,
            destination: Coordinate::planet(1, 2, 3),
            destination_name: "Home".to_string(),
            arrival_time: None,
            arrive_in: 0,
            attacker_name: String::new(),
            attacker_id: 0,
            union_id,
            missiles: 0,
            ships: Some(ShipsInfos {
                light_fighter: fighters,
                ..Default::default()
            }),
        }
    }

    fn row(event: AttackEvent, partner: bool) -> AttackRow {
        AttackRow {
            event,
            partner,
            hostile: true,
            friendly: false,
        }
    }

    #[test]
    fn test_union_ships_are_added() {
        let rows = vec![row(event(7, 5), false), row(event(7, 3), false)];
        let out = merge(rows, &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].ships.unwrap().light_fighter, 8);
    }

    #[test]
    fn test_partner_rows_contribute_but_are_not_emitted() {
        let mut second = event(7, 3);
        second.attacker_id = 99;
        second.origin = Some(Coordinate::planet(5, 5, 5));
        let rows = vec![row(event(7, 5), false), row(second, true)];
        let out = merge(rows, &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].attacker_id, 99);
        assert_eq!(out[0].origin, Some(Coordinate::planet(5, 5, 5)));
    }

    #[test]
    fn test_populated_origin_is_kept() {
        let mut first = event(7, 1);
        first.origin = Some(Coordinate::planet(1, 1, 1));
        let mut second = event(7, 1);
        second.origin = Some(Coordinate::planet(2, 2, 2));
        let out = merge(vec![row(first, false), row(second, false)], &[]);
        assert_eq!(out[0].origin, Some(Coordinate::planet(1, 1, 1)));
    }

    #[test]
    fn test_friendly_invitation_to_own_planet_is_hostile() {
        let own = [Coordinate::planet(1, 2, 3)];
        let invitation = AttackRow {
            event: event(0, 2),
            partner: false,
            hostile: false,
            friendly: true,
        };
        assert_eq!(merge(vec![invitation.clone()], &own).len(), 1);
        assert!(merge(vec![invitation], &[]).is_empty());
    }

    #[test]
    fn test_rows_without_union_stay_separate() {
        let out = merge(vec![row(event(0, 5), false), row(event(0, 3), false)], &[]);
        assert_eq!(out.len(), 2);
    }
}
