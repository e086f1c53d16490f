use alloc::vec;
use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::*;

impl Board {
    /// Whether revealing `coords` carries on to its neighbors.
    ///
    /// Blank tiles always spread. A numbered tile spreads once as many neighbors are flagged as it has bombs
    /// around it, which is what makes a fully flagged number reveal the rest of its neighborhood.
    pub fn spreads_from(&self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        Ok(self.spreads_at(coords))
    }

    fn spreads_at(&self, coords: Coord2) -> bool {
        match self[coords].adjacent_bombs() {
            Some(0) => true,
            Some(count) => self.count_adjacent_flags(coords) == count,
            None => false,
        }
    }

    /// Reveals `coords` and flood-fills outward, returning the resulting board.
    ///
    /// `self` is left untouched. Revealing a flagged tile changes nothing. Revealing an already revealed
    /// tile re-checks its spread condition, so it acts as a chord on a satisfied number.
    pub fn reveal(&self, coords: Coord2) -> Result<(Board, RevealOutcome)> {
        use RevealOutcome::*;

        let coords = self.validate_coords(coords)?;
        if self[coords].is_flagged() {
            log::trace!("reveal on flagged tile {:?} ignored", coords);
            return Ok((self.clone(), NoChange));
        }

        let mut next = self.clone();
        let mut hit_bomb = false;
        let mut newly_revealed: CellCount = 0;
        let mut queued = HashSet::new();
        queued.insert(coords);
        let mut pending = vec![coords];

        // a bomb does not stop the walk, everything already queued is still processed
        while let Some(visit_coords) = pending.pop() {
            let tile = next[visit_coords];

            if tile.is_bomb() {
                log::debug!("bomb revealed at {:?}", visit_coords);
                hit_bomb = true;
            }

            if !tile.is_revealed() {
                next.replace(tile.into_revealed());
                newly_revealed += 1;
            }

            if next.spreads_at(visit_coords) {
                let spread: SmallVec<[Coord2; 8]> = next
                    .iter_neighbors(visit_coords)
                    .filter(|&pos| !next[pos].is_revealed() && !next[pos].is_flagged())
                    .filter(|&pos| queued.insert(pos))
                    .collect();
                log::trace!("spreading from {:?} to {:?}", visit_coords, spread);
                pending.extend(spread);
            }
        }

        let outcome = if hit_bomb {
            next.reveal_unflagged_bombs();
            Lost
        } else if next.revealed_count() + next.bomb_count() == next.total_cells() {
            next.flag_unflagged_bombs();
            Won
        } else if newly_revealed > 0 {
            Revealed
        } else {
            NoChange
        };

        log::debug!(
            "reveal at {:?} opened {} tiles: {:?}",
            coords,
            newly_revealed,
            outcome
        );
        Ok((next, outcome))
    }

    /// Flips the flag on `coords`, returning the resulting board. Revealed tiles can be flagged too.
    pub fn toggle_flag(&self, coords: Coord2) -> Result<(Board, MarkOutcome)> {
        let coords = self.validate_coords(coords)?;
        let tile = self[coords];
        let flagged = !tile.is_flagged();

        let mut next = self.clone();
        next.replace(tile.with_flag(flagged));

        let outcome = if flagged {
            MarkOutcome::Flagged
        } else {
            MarkOutcome::Unflagged
        };
        log::trace!("flag at {:?}: {:?}", coords, outcome);
        Ok((next, outcome))
    }

    fn reveal_unflagged_bombs(&mut self) {
        self.update_bombs(|tile| (!tile.is_flagged()).then(|| tile.into_revealed()));
    }

    fn flag_unflagged_bombs(&mut self) {
        self.update_bombs(|tile| (!tile.is_flagged()).then(|| tile.with_flag(true)));
    }

    fn update_bombs(&mut self, update: impl Fn(Tile) -> Option<Tile>) {
        let (width, height) = self.size();
        for y in 0..height {
            for x in 0..width {
                let tile = self[(x, y)];
                if tile.is_bomb() {
                    if let Some(updated) = update(tile) {
                        self.replace(updated);
                    }
                }
            }
        }
    }
}
