use chrono::Utc;
use seatplan_core::{
    EditMode, LayoutError, LayoutRepository, LayoutResult, Person, PlacementConflict, Row, Seat,
};
use seatplan_shared::{LayoutEvent, Rect, SeatField};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::collision::CollisionResolver;
use crate::document::LayoutDocument;
use crate::layout::{check_finite, Layout, SeatUpdate};
use crate::numbering::NumberingAssigner;
use crate::selection::Selection;
use crate::spatial::{Alignment, ArrangeParams, SpacingAxis, SpatialEngine};

const EVENT_CAPACITY: usize = 256;

/// Read model of a seat with its derived row name and selection flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatView {
    pub seat_uuid: Uuid,
    pub row_uuid: Option<Uuid>,
    pub row_name: String,
    pub number: Option<String>,
    pub position_x: f64,
    pub position_y: f64,
    pub angle: f64,
    pub person: Option<Person>,
    pub is_selected: bool,
}

/// One editing session over a project's layout.
///
/// Owns the working copy and the selection, and writes the whole layout
/// back through the repository after every successful mutation. Methods
/// take `&mut self`, so operations never overlap.
pub struct LayoutSession {
    project_id: i64,
    repo: Arc<dyn LayoutRepository>,
    layout: Layout,
    selection: Selection,
    mode: EditMode,
    pub show_row_name: bool,
    pub show_device: bool,
    events: broadcast::Sender<LayoutEvent>,
}

impl LayoutSession {
    /// Prepare the store and load the project's layout.
    pub async fn open(repo: Arc<dyn LayoutRepository>, project_id: i64) -> LayoutResult<Self> {
        repo.initialize().await?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let mut session = Self {
            project_id,
            repo,
            layout: Layout::new(),
            selection: Selection::new(),
            mode: EditMode::Edit,
            show_row_name: true,
            show_device: true,
            events,
        };
        session.reload().await?;
        Ok(session)
    }

    /// Discard the working copy and selection and re-read the store.
    pub async fn reload(&mut self) -> LayoutResult<()> {
        let snapshot = self.repo.load(self.project_id).await?;
        self.layout = Layout::from_snapshot(snapshot);
        self.selection.clear();

        let (rows, seats) = (self.layout.rows().len(), self.layout.seats().len());
        info!("Loaded project {}: {} rows, {} seats", self.project_id, rows, seats);
        self.publish(LayoutEvent::LayoutLoaded {
            project_id: self.project_id,
            rows,
            seats,
        });
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LayoutEvent> {
        self.events.subscribe()
    }

    pub fn project_id(&self) -> i64 {
        self.project_id
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.mode != EditMode::Edit
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        if self.mode != mode {
            self.mode = mode;
            self.publish(LayoutEvent::ModeChanged {
                read_only: self.is_read_only(),
            });
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn rows(&self) -> &[Row] {
        self.layout.rows()
    }

    pub fn seats(&self) -> &[Seat] {
        self.layout.seats()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, seat_uuid: Uuid) -> bool {
        self.selection.contains(seat_uuid)
    }

    /// Selected seats in selection order.
    pub fn selected_seats(&self) -> Vec<&Seat> {
        let seats = self.layout.seats();
        self.selection.indices(seats).into_iter().map(|i| &seats[i]).collect()
    }

    pub fn seat_view(&self, seat_uuid: Uuid) -> Option<SeatView> {
        self.layout.seat(seat_uuid).map(|seat| self.view_of(seat))
    }

    pub fn seat_views(&self) -> Vec<SeatView> {
        self.layout.seats().iter().map(|seat| self.view_of(seat)).collect()
    }

    // ------------------------------------------------------------------
    // Entity model
    // ------------------------------------------------------------------

    /// Add a row unless one with that name exists. Returns the new row's id.
    pub async fn add_row(&mut self, name: &str) -> LayoutResult<Option<Uuid>> {
        if self.is_read_only() {
            return Ok(None);
        }
        let Some(row) = self.layout.add_row(name)?.cloned() else {
            debug!("Row '{}' already exists", name);
            return Ok(None);
        };

        self.commit().await?;
        self.publish(LayoutEvent::RowAdded {
            row_uuid: row.uuid(),
            name: row.name.clone(),
        });
        Ok(Some(row.uuid()))
    }

    /// Delete a row no seat references. Returns whether a row was removed.
    pub async fn delete_row(&mut self, name: &str) -> LayoutResult<bool> {
        if self.is_read_only() {
            return Ok(false);
        }
        let Some(row) = self.layout.delete_row(name)? else {
            return Ok(false);
        };

        self.commit().await?;
        self.publish(LayoutEvent::RowRemoved {
            row_uuid: row.uuid(),
            name: row.name,
        });
        Ok(true)
    }

    pub async fn add_empty_seat(&mut self, position_x: f64, position_y: f64) -> LayoutResult<Option<Uuid>> {
        if self.is_read_only() {
            return Ok(None);
        }
        let seat_uuid = self.layout.add_seat(position_x, position_y)?;

        self.commit().await?;
        self.publish(LayoutEvent::SeatAdded { seat_uuid });
        Ok(Some(seat_uuid))
    }

    pub async fn update_seat(&mut self, seat_uuid: Uuid, update: &SeatUpdate) -> LayoutResult<()> {
        if self.is_read_only() {
            return Ok(());
        }
        let fields = self.layout.update_seat(seat_uuid, update)?;

        self.commit().await?;
        self.publish(LayoutEvent::seat_changed(seat_uuid, &fields));
        Ok(())
    }

    pub async fn delete_seat(&mut self, seat_uuid: Uuid) -> LayoutResult<()> {
        if self.is_read_only() {
            return Ok(());
        }
        self.layout.remove_seat(seat_uuid)?;
        let deselected = self.selection.remove(seat_uuid);

        self.commit().await?;
        self.publish(LayoutEvent::SeatRemoved { seat_uuid });
        if deselected {
            self.publish_selection();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub async fn select_by_rect(&mut self, rect: Rect, additive: bool) -> LayoutResult<()> {
        if self.is_read_only() {
            return Ok(());
        }
        check_finite(&[rect.x, rect.y, rect.width, rect.height])?;
        self.selection.select_by_rect(self.layout.seats(), &rect, additive);
        self.commit_selection().await
    }

    /// Flip one seat in or out of the selection (modifier-click).
    pub async fn toggle_seat(&mut self, seat_uuid: Uuid) -> LayoutResult<bool> {
        if self.is_read_only() {
            return Ok(self.is_selected(seat_uuid));
        }
        self.require_seat(seat_uuid)?;
        let selected = self.selection.toggle(seat_uuid);
        self.commit_selection().await?;
        Ok(selected)
    }

    /// Plain click on a seat.
    pub async fn select_seat(&mut self, seat_uuid: Uuid) -> LayoutResult<()> {
        if self.is_read_only() {
            return Ok(());
        }
        self.require_seat(seat_uuid)?;
        self.selection.select_only(seat_uuid);
        self.commit_selection().await
    }

    pub async fn clear_selection(&mut self) -> LayoutResult<()> {
        if self.is_read_only() {
            return Ok(());
        }
        self.selection.clear();
        self.commit_selection().await
    }

    // ------------------------------------------------------------------
    // Spatial operations (all act on the selection)
    // ------------------------------------------------------------------

    pub async fn align(&mut self, alignment: Alignment) -> LayoutResult<()> {
        if self.is_read_only() || self.selection.is_empty() {
            return Ok(());
        }
        let changed = SpatialEngine::align(self.layout.seats_mut(), &self.selection, alignment);
        let field = match alignment {
            Alignment::Left | Alignment::Right => SeatField::PositionX,
            Alignment::Top | Alignment::Bottom => SeatField::PositionY,
        };
        self.commit_changes(&changed, &[field]).await
    }

    pub async fn align_left(&mut self) -> LayoutResult<()> {
        self.align(Alignment::Left).await
    }

    pub async fn align_right(&mut self) -> LayoutResult<()> {
        self.align(Alignment::Right).await
    }

    pub async fn align_top(&mut self) -> LayoutResult<()> {
        self.align(Alignment::Top).await
    }

    pub async fn align_bottom(&mut self) -> LayoutResult<()> {
        self.align(Alignment::Bottom).await
    }

    pub async fn rotate_selected(&mut self, delta: f64) -> LayoutResult<()> {
        if self.is_read_only() || self.selection.is_empty() {
            return Ok(());
        }
        check_finite(&[delta])?;
        let changed = SpatialEngine::rotate(self.layout.seats_mut(), &self.selection, delta);
        self.commit_changes(&changed, &[SeatField::Angle]).await
    }

    pub async fn set_spacing(&mut self, axis: SpacingAxis, spacing: f64) -> LayoutResult<()> {
        if self.is_read_only() || self.selection.is_empty() {
            return Ok(());
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(LayoutError::InvalidArgument(format!(
                "spacing must be a positive number, got {}",
                spacing
            )));
        }
        let changed = SpatialEngine::apply_spacing(self.layout.seats_mut(), &self.selection, axis, spacing);
        let field = match axis {
            SpacingAxis::Horizontal => SeatField::PositionX,
            SpacingAxis::Vertical => SeatField::PositionY,
        };
        self.commit_changes(&changed, &[field]).await
    }

    pub async fn set_horizontal_spacing(&mut self, spacing: f64) -> LayoutResult<()> {
        self.set_spacing(SpacingAxis::Horizontal, spacing).await
    }

    pub async fn set_vertical_spacing(&mut self, spacing: f64) -> LayoutResult<()> {
        self.set_spacing(SpacingAxis::Vertical, spacing).await
    }

    /// Lay out every seat, selected or not, on a wrapping grid.
    pub async fn auto_arrange(&mut self, params: ArrangeParams) -> LayoutResult<()> {
        if self.is_read_only() {
            return Ok(());
        }
        check_finite(&[params.spacing_x, params.spacing_y, params.max_width])?;
        if params.spacing_x <= 0.0 {
            return Err(LayoutError::InvalidArgument("spacing_x must be positive".to_string()));
        }
        let changed = SpatialEngine::auto_arrange(self.layout.seats_mut(), &params);
        self.commit_changes(&changed, &[SeatField::PositionX, SeatField::PositionY])
            .await
    }

    pub async fn auto_arrange_seats(&mut self) -> LayoutResult<()> {
        self.auto_arrange(ArrangeParams::default()).await
    }

    /// Move the selection as a free-form drag, then push moved seats off any
    /// seat they landed on.
    ///
    /// Seats that could not be cleared are returned as warnings; the move is
    /// committed either way.
    pub async fn drag_selected(&mut self, dx: f64, dy: f64) -> LayoutResult<Vec<PlacementConflict>> {
        if self.is_read_only() || self.selection.is_empty() {
            return Ok(Vec::new());
        }
        check_finite(&[dx, dy])?;
        let (moved, conflicts) = CollisionResolver::drag(self.layout.seats_mut(), &self.selection, dx, dy);
        for conflict in &conflicts {
            warn!("{}", conflict);
        }
        self.commit_changes(&moved, &[SeatField::PositionX, SeatField::PositionY])
            .await?;
        Ok(conflicts)
    }

    // ------------------------------------------------------------------
    // Numbering
    // ------------------------------------------------------------------

    /// Number the selection in reading order.
    ///
    /// On a duplicate the call fails without committing; seats numbered
    /// before the collision keep their numbers in the working copy.
    pub async fn set_seat_numbers(&mut self, start: i64, increment: bool) -> LayoutResult<()> {
        if self.is_read_only() || self.selection.is_empty() {
            return Ok(());
        }
        let mut renumbered = Vec::new();
        let result = NumberingAssigner::new(start, increment).run(&mut self.layout, &self.selection, &mut renumbered);

        for seat_uuid in &renumbered {
            self.publish(LayoutEvent::seat_changed(*seat_uuid, &[SeatField::Number]));
        }
        if let Err(e) = result {
            warn!("Numbering aborted after {} seat(s): {}", renumbered.len(), e);
            return Err(e);
        }
        self.commit().await
    }

    // ------------------------------------------------------------------
    // Document form
    // ------------------------------------------------------------------

    pub fn export_document(&self) -> LayoutDocument {
        LayoutDocument::from_layout(&self.layout)
    }

    /// Replace the whole layout with the document's contents.
    pub async fn import_document(&mut self, document: LayoutDocument) -> LayoutResult<()> {
        if self.is_read_only() {
            return Ok(());
        }
        self.layout = document.into_layout()?;
        self.selection.clear();

        self.commit().await?;
        self.publish(LayoutEvent::LayoutLoaded {
            project_id: self.project_id,
            rows: self.layout.rows().len(),
            seats: self.layout.seats().len(),
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Write the full working copy to the store.
    async fn commit(&mut self) -> LayoutResult<()> {
        let receipt = self
            .repo
            .save(self.project_id, self.layout.rows(), self.layout.seats())
            .await
            .map_err(|e| {
                warn!("Save failed for project {}, store is now behind: {}", self.project_id, e);
                e
            })?;

        for (seat_uuid, participant_id) in receipt.assigned_participants {
            self.layout.assign_participant(seat_uuid, participant_id);
        }
        debug!(
            "Saved project {} ({} rows, {} seats)",
            self.project_id,
            self.layout.rows().len(),
            self.layout.seats().len()
        );
        self.publish(LayoutEvent::LayoutSaved {
            project_id: self.project_id,
            at: Utc::now(),
        });
        Ok(())
    }

    async fn commit_changes(&mut self, changed: &[Uuid], fields: &[SeatField]) -> LayoutResult<()> {
        self.commit().await?;
        for seat_uuid in changed {
            self.publish(LayoutEvent::seat_changed(*seat_uuid, fields));
        }
        Ok(())
    }

    async fn commit_selection(&mut self) -> LayoutResult<()> {
        self.publish_selection();
        self.commit().await
    }

    fn publish_selection(&self) {
        self.publish(LayoutEvent::SelectionChanged {
            selected: self.selection.members().to_vec(),
        });
    }

    fn publish(&self, event: LayoutEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn require_seat(&self, seat_uuid: Uuid) -> LayoutResult<()> {
        self.layout
            .seat(seat_uuid)
            .map(|_| ())
            .ok_or(LayoutError::SeatNotFound(seat_uuid))
    }

    fn view_of(&self, seat: &Seat) -> SeatView {
        SeatView {
            seat_uuid: seat.uuid(),
            row_uuid: seat.row_uuid,
            row_name: self.layout.row_name(seat).to_string(),
            number: seat.number.clone(),
            position_x: seat.position_x,
            position_y: seat.position_y,
            angle: seat.angle,
            person: seat.person.clone(),
            is_selected: self.selection.contains(seat.uuid()),
        }
    }
}
