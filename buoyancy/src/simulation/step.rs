use bevy_math::DVec2;

use crate::basin::{Basin, BasinId};
use crate::body::{Body, BodyId, BodyStep};
use crate::containment;
use crate::engine::PhysicsEngine;
use crate::forces::{evaluate_body, limit_drag, BodyReport};
use crate::solver::{empty_volume, solve_basin, SolveOutcome};
use crate::spill::SpillInputs;
use crate::tuning::SimTuning;

use super::types::{BasinReport, StepDebug, StepReport};
use super::Simulation;

/// Body snapshots and basin assignments of one tick. Built right after the
/// engine step and read by every later stage of the same tick.
#[derive(Debug, Clone, Default)]
pub(super) struct StepContext {
    /// Visible bodies only.
    steps: Vec<BodyStep>,
    /// Parallel to `steps`.
    assignments: Vec<Option<BasinId>>,
}

impl StepContext {
    fn capture<E: PhysicsEngine>(bodies: &[Body], engine: &E) -> Self {
        let steps: Vec<BodyStep> = bodies
            .iter()
            .filter(|b| b.visible)
            .map(|b| BodyStep::capture(b, engine.position(b.handle), engine.velocity(b.handle)))
            .collect();
        let assignments = vec![None; steps.len()];
        Self { steps, assignments }
    }

    fn assign(&mut self, candidates: &[&Basin], tuning: &SimTuning) {
        self.assignments = containment::assign(&self.steps, candidates, tuning);
    }

    pub(super) fn lookup(&self, id: BodyId) -> Option<(&BodyStep, Option<BasinId>)> {
        let i = self.steps.iter().position(|s| s.id == id)?;
        Some((&self.steps[i], self.assignments[i]))
    }

    /// Bodies displacing into `basin` this tick.
    pub(super) fn displacers(&self, basin: BasinId) -> Vec<BodyStep> {
        self.steps
            .iter()
            .zip(&self.assignments)
            .filter(|(_, a)| **a == Some(basin))
            .map(|(s, _)| *s)
            .collect()
    }

    /// Assignment per body id; hidden bodies have none.
    fn assignments_by_body(&self, body_count: usize) -> Vec<Option<BasinId>> {
        let mut out = vec![None; body_count];
        for (s, a) in self.steps.iter().zip(&self.assignments) {
            if let Some(slot) = out.get_mut(s.id.0) {
                *slot = *a;
            }
        }
        out
    }
}

#[derive(Debug, Default)]
struct SolveTotals {
    pool_overflow: f64,
    boat_overflow: f64,
}

impl<E: PhysicsEngine> Simulation<E> {
    pub(super) fn advance(&mut self, dt: f64, mut dbg: Option<&mut StepDebug>) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if dt > 0.0 {
            self.engine.step(dt);
            self.time += dt;
            self.last_dt = dt;
        }

        let mut ctx = StepContext::capture(&self.bodies, &self.engine);
        self.update_boat_frame(&ctx);

        {
            let candidates = self.candidate_basins();
            ctx.assign(&candidates, &self.tuning);
        }

        let mut iterations = vec![0u32; self.basins.len()];
        let mut totals = SolveTotals::default();
        self.solve_all(&ctx, &mut iterations, &mut totals);

        let transfer = self.run_spill(&ctx, dt);
        if transfer != 0.0 {
            self.solve_all(&ctx, &mut iterations, &mut totals);
        }

        let (reports, carried_weight) = self.evaluate_forces(&ctx);
        for (body, report) in self.bodies.iter().zip(&reports) {
            if body.visible {
                self.engine.apply_force(body.handle, report.external_force);
            }
        }

        if let Some(dbg) = dbg.as_deref_mut() {
            dbg.dt = dt;
            dbg.time = self.time;
            dbg.assignments = ctx.assignments_by_body(self.bodies.len());
            dbg.iterations = iterations;
            dbg.transfer = transfer;
            dbg.pool_overflow = totals.pool_overflow;
            dbg.boat_overflow = totals.boat_overflow;
            dbg.carried_weight = carried_weight;
            dbg.spill_state = self.spill_state();
        }

        self.report = StepReport {
            time: self.time,
            basins: self
                .basins
                .iter()
                .map(|b| BasinReport {
                    liquid_volume: b.liquid_volume(),
                    liquid_height: b.liquid_height(),
                    capacity: b.capacity(),
                    child: b.child(),
                })
                .collect(),
            bodies: reports,
            spill_state: self.spill_state(),
            total_liquid_volume: self.total_liquid_volume(),
        };
        self.context = ctx;
    }

    /// Moves the boat interior with the hull and links it under the pool
    /// while the boat is shown.
    fn update_boat_frame(&mut self, ctx: &StepContext) {
        let Some(rig) = self.boat.as_ref() else { return };
        let pool = self.pool;
        match ctx.lookup(rig.body) {
            Some((step, _)) => {
                self.basins[rig.basin.0].update_boat_frame(step.x, step.bottom, rig.multiplier);
                self.basins[pool.0].set_child(Some(rig.basin));
            }
            None => self.basins[pool.0].set_child(None),
        }
    }

    /// Boat interior before the pool, so a body in the boat never falls
    /// through to the pool underneath.
    fn candidate_basins(&self) -> Vec<&Basin> {
        let mut out = Vec::with_capacity(2);
        if self.boat_visible() {
            if let Some(rig) = &self.boat {
                out.push(&self.basins[rig.basin.0]);
            }
        }
        out.push(&self.basins[self.pool.0]);
        out
    }

    fn solve_one(&mut self, ctx: &StepContext, id: BasinId) -> SolveOutcome {
        let displacers = ctx.displacers(id);
        solve_basin(&mut self.basins[id.0], &displacers, &self.tuning)
    }

    fn solve_all(&mut self, ctx: &StepContext, iterations: &mut [u32], totals: &mut SolveTotals) {
        if self.boat_visible() {
            if let Some(basin) = self.boat.as_ref().map(|r| r.basin) {
                let out = self.solve_one(ctx, basin);
                iterations[basin.0] = out.iterations;
                if out.overflow > 0.0 {
                    tracing::debug!(overflow = out.overflow, "boat overflowed into the pool");
                    totals.boat_overflow += out.overflow;
                    totals.pool_overflow += self.pour_into_pool(out.overflow);
                }
            }
        }

        let pool = self.pool;
        let out = self.solve_one(ctx, pool);
        iterations[pool.0] = out.iterations;
        if out.overflow > 0.0 {
            tracing::debug!(overflow = out.overflow, "pool overflowed");
            totals.pool_overflow += out.overflow;
        }
    }

    /// Runs the spill controller and moves the volume it asks for. Returns the
    /// pool to boat transfer.
    fn run_spill(&mut self, ctx: &StepContext, dt: f64) -> f64 {
        if !self.boat_visible() {
            return 0.0;
        }
        let Some(rig) = self.boat.as_ref() else { return 0.0 };
        let Some((step, assigned)) = ctx.lookup(rig.body) else { return 0.0 };

        let pool = &self.basins[self.pool.0];
        let basin = &self.basins[rig.basin.0];
        let room = empty_volume(basin, &ctx.displacers(rig.basin), basin.step_top()).max(0.0);
        let inputs = SpillInputs {
            dt,
            boat_volume: rig.volume,
            boat_top: step.top,
            boat_height: step.height(),
            boat_in_pool: assigned == Some(self.pool),
            pool_height: pool.liquid_height(),
            pool_volume: pool.liquid_volume(),
            carried: basin.liquid_volume(),
            capacity: room,
        };
        let basin_id = rig.basin;

        let tuning = self.tuning;
        let Some(rig) = self.boat.as_mut() else { return 0.0 };
        let transfer = rig.controller.update(&inputs, &tuning);
        if transfer != 0.0 {
            let pool = &mut self.basins[self.pool.0];
            pool.set_liquid_volume(inputs.pool_volume - transfer);
            self.basins[basin_id.0].set_liquid_volume(inputs.carried + transfer);
        }
        transfer
    }

    /// Buoyancy and drag per body against its basin's final height. Drag is
    /// capped by the last step's length. The boat additionally carries the
    /// weight of the liquid in its interior.
    fn evaluate_forces(&self, ctx: &StepContext) -> (Vec<BodyReport>, DVec2) {
        let density = self.liquid.density();
        let gravity = self.gravity.vector();
        let mut carried_weight = DVec2::ZERO;

        let reports = self
            .bodies
            .iter()
            .map(|body| {
                let Some((step, basin)) = ctx.lookup(body.id) else {
                    return BodyReport::default();
                };
                let level = basin.map(|id| self.basins[id.0].liquid_height());
                let mut report = evaluate_body(step, basin, level, density, gravity, &self.tuning);
                report.drag_force = limit_drag(report.drag_force, step.velocity, body.mass(), self.last_dt);
                report.external_force = report.buoyant_force + report.drag_force;

                if let Some(rig) = self.boat.as_ref().filter(|r| r.body == body.id) {
                    let carried = self.basins[rig.basin.0].liquid_volume() * density;
                    report.carried_mass = carried;
                    carried_weight = gravity * carried;
                    report.external_force += carried_weight;
                }
                report
            })
            .collect();
        (reports, carried_weight)
    }
}
