//! Per-connection session state machine.
//!
//! A session starts empty. Loading a grid moves it to ready and kicks off
//! two background jobs, one computing the components and one the pattern
//! count, each publishing into its own promise. Reads of those promises
//! wait for the job; path queries run inline against the current grid.
//!
//! Before any grid arrives the promises already hold an empty component
//! list and a count of `-1`, so out-of-order queries answer immediately.

use crate::channel::Channel;
use crate::error::SessionError;
use crate::protocol::{Request, Response};
use std::sync::Arc;
use tessera_core::{Cell, Grid, Promise};
use tessera_graph::{all_components, best_first, bfs, pattern_count, Component, GridTraversal};
use tokio::runtime::Handle;
use tracing::{debug, error, info, Instrument, Span};
use uuid::Uuid;

/// State owned by one connection.
pub struct Session {
    id: Uuid,
    executor: Handle,
    grid: Option<Arc<Grid>>,
    components: Promise<Arc<Vec<Component>>>,
    pattern_count: Promise<i64>,
    running: bool,
}

impl Session {
    /// Creates an empty session whose background work runs on `executor`.
    pub fn new(executor: Handle) -> Self {
        Self {
            id: Uuid::new_v4(),
            executor,
            grid: None,
            components: Promise::ready(Arc::new(Vec::new())),
            pattern_count: Promise::ready(-1),
            running: true,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The grid currently loaded, if any.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_deref()
    }

    /// Applies one request.
    ///
    /// Returns the response to send back, or `None` for `stop`. An error
    /// means the session must end; nothing should be sent for the request.
    pub async fn handle(&mut self, request: Request) -> Result<Option<Response>, SessionError> {
        let response = match request {
            Request::LoadGrid(rows) => self.load_grid(rows),
            Request::GetComponents => {
                let components = self.components.get().await?;
                Response::Components(components.as_ref().clone())
            }
            Request::GetPatternCount => Response::PatternCount(self.pattern_count.get().await?),
            Request::GetShortestPath(endpoints) => self.find_path(&endpoints, |t| bfs(t))?,
            Request::GetWeightedPath(endpoints) => self.find_path(&endpoints, |t| best_first(t))?,
            Request::Stop => {
                info!("Stop requested");
                self.running = false;
                return Ok(None);
            }
        };
        Ok(Some(response))
    }

    /// Replaces the grid and restarts background analysis for it.
    fn load_grid(&mut self, rows: Vec<Vec<i32>>) -> Response {
        let grid = Arc::new(Grid::new(rows));
        info!(
            "Loaded {} row grid with {} non-zero cells",
            grid.row_count(),
            grid.non_zero_cells().count()
        );

        let (components_tx, components) = Promise::pending();
        let (count_tx, count) = Promise::pending();
        self.components = components;
        self.pattern_count = count;

        let executor = self.executor.clone();
        let target = Arc::clone(&grid);
        self.executor.spawn(
            async move {
                match all_components(target, &executor).await {
                    Ok(found) => {
                        debug!("Components ready ({})", found.len());
                        components_tx.resolve(Arc::new(found));
                    }
                    Err(e) => error!("Component analysis failed: {}", e),
                }
            }
            .instrument(Span::current()),
        );

        let executor = self.executor.clone();
        let target = Arc::clone(&grid);
        self.executor.spawn(
            async move {
                match pattern_count(target, &executor).await {
                    Ok(count) => {
                        debug!("Pattern count ready ({})", count);
                        count_tx.resolve(i64::try_from(count).unwrap_or(i64::MAX));
                    }
                    Err(e) => error!("Pattern count failed: {}", e),
                }
            }
            .instrument(Span::current()),
        );

        let echo = grid.as_ref().clone();
        self.grid = Some(grid);
        Response::Grid(echo)
    }

    fn find_path(
        &self,
        endpoints: &[Cell],
        search: impl Fn(&GridTraversal<'_>) -> Option<Vec<Cell>>,
    ) -> Result<Response, SessionError> {
        let grid = self.grid.as_deref().ok_or(SessionError::NoGrid)?;
        let (start, end) = validate_endpoints(grid, endpoints)?;
        info!("Path from {} to {}", start, end);

        let path = search(&GridTraversal::new(grid, start, end));
        debug!("Path has {} cells", path.as_ref().map_or(0, Vec::len));
        Ok(Response::Path(path))
    }
}

/// Checks that a path request names exactly two distinct, in-bounds,
/// non-zero cells. The returned cells carry the grid's weights; whatever
/// weight the client sent is ignored.
fn validate_endpoints(grid: &Grid, endpoints: &[Cell]) -> Result<(Cell, Cell), SessionError> {
    let [start, end] = endpoints else {
        return Err(SessionError::InvalidEndpoints(format!(
            "expected 2 endpoints, got {}",
            endpoints.len()
        )));
    };

    if start == end {
        return Err(SessionError::InvalidEndpoints(format!(
            "start and end are both {}",
            start
        )));
    }

    let resolve = |cell: &Cell| -> Result<Cell, SessionError> {
        let resolved = grid
            .cell_at(cell.row, cell.col)
            .ok_or_else(|| SessionError::InvalidEndpoints(format!("{} is outside the grid", cell)))?;
        if resolved.weight == Some(0) {
            return Err(SessionError::InvalidEndpoints(format!(
                "{} has zero weight",
                cell
            )));
        }
        Ok(resolved)
    };

    Ok((resolve(start)?, resolve(end)?))
}

/// Serves requests from `channel` until the client stops, hangs up, or a
/// request fails.
///
/// Requests are handled strictly in arrival order. Unknown tags are
/// skipped. Any error ends the loop and is returned without anything being
/// sent for the failing request.
pub async fn run_session<C>(channel: &mut C, session: &mut Session) -> Result<(), SessionError>
where
    C: Channel + ?Sized,
{
    while session.is_running() {
        let Some(envelope) = channel.recv().await? else {
            debug!("Client hung up");
            return Ok(());
        };

        let Some(request) = Request::from_envelope(&envelope)? else {
            debug!("Ignoring unknown request '{}'", envelope.kind);
            continue;
        };

        debug!("Handling '{}'", request.tag());
        if let Some(response) = session.handle(request).await? {
            channel.send(&response).await?;
        }
    }

    if let Err(e) = channel.close().await {
        debug!("Close after stop failed: {}", e);
    }
    Ok(())
}
