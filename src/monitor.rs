use glam::IVec2;

use crate::types::{Dimension, Rect};

/// One display as reported by the platform.
///
/// `size` is the full extent of the display and is only used to decide which
/// display the creature is on. `work_area` is where the creature may stand and
/// walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Monitor {
    pub position: IVec2,
    pub size: Dimension,
    pub work_area: Rect,
}

impl Monitor {
    pub fn new(position: IVec2, size: Dimension, work_area: Rect) -> Self {
        Self {
            position,
            size,
            work_area,
        }
    }

    /// Monitor whose work area covers the whole display.
    pub fn full(position: IVec2, size: Dimension) -> Self {
        Self::new(position, size, Rect::from_parts(position, size))
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// Lowest y the top edge of a sprite of `height` may take while standing on
    /// this monitor.
    pub fn floor(&self, height: i32) -> i32 {
        self.work_area.y + self.work_area.h - height - 1
    }
}

/// Picks the monitor the creature overlaps most. On equal overlap the monitor
/// listed first wins. Returns `None` when nothing overlaps.
pub fn resolve(creature: Rect, monitors: &[Monitor]) -> Option<Monitor> {
    monitors
        .iter()
        .filter_map(|monitor| {
            creature
                .intersection(monitor.bounds())
                .map(|overlap| (overlap.area(), monitor))
        })
        .fold(None::<(i64, &Monitor)>, |best, (area, monitor)| match best {
            Some((best_area, _)) if best_area >= area => best,
            _ => Some((area, monitor)),
        })
        .map(|(_, monitor)| *monitor)
}

impl From<&winit::monitor::MonitorHandle> for Monitor {
    // Work area starts out as the whole display; see `with_work_area`.
    fn from(handle: &winit::monitor::MonitorHandle) -> Self {
        let position = handle.position();
        let size = handle.size();
        Monitor::full(
            IVec2::new(position.x, position.y),
            Dimension::new(size.width as i32, size.height as i32),
        )
    }
}

/// A display's full rectangle and its usable part, as the OS reports them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayArea {
    pub bounds: Rect,
    pub work_area: Rect,
}

impl Monitor {
    /// Takes the work area of the display that starts at the same position.
    /// Keeps the current work area when no display matches.
    pub fn with_work_area(mut self, areas: &[DisplayArea]) -> Self {
        if let Some(area) = areas
            .iter()
            .find(|area| area.bounds.x == self.position.x && area.bounds.y == self.position.y)
        {
            self.work_area = area.work_area;
        }
        self
    }
}

/// Enumerates the displays visible to `window`.
pub fn query(window: &winit::window::Window) -> Vec<Monitor> {
    let areas = display_areas();
    window
        .available_monitors()
        .map(|handle| Monitor::from(&handle).with_work_area(&areas))
        .collect()
}

#[cfg(windows)]
fn display_areas() -> Vec<DisplayArea> {
    use windows_sys::Win32::{
        Foundation::{LPARAM, RECT},
        Graphics::Gdi::{EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO},
    };

    unsafe extern "system" fn collect(
        hmon: HMONITOR,
        _hdc: HDC,
        _rc: *mut RECT,
        lparam: LPARAM,
    ) -> i32 {
        unsafe {
            let out = &mut *(lparam as *mut Vec<DisplayArea>);
            let mut info: MONITORINFO = std::mem::zeroed();
            info.cbSize = std::mem::size_of::<MONITORINFO>() as u32;
            if GetMonitorInfoW(hmon, &mut info) != 0 {
                let full = info.rcMonitor;
                let work = info.rcWork;
                out.push(DisplayArea {
                    bounds: Rect::from_edges(full.left, full.top, full.right, full.bottom),
                    work_area: Rect::from_edges(work.left, work.top, work.right, work.bottom),
                });
            }
            1
        }
    }

    let mut areas: Vec<DisplayArea> = Vec::new();
    unsafe {
        EnumDisplayMonitors(
            std::ptr::null_mut(),
            std::ptr::null(),
            Some(collect),
            (&mut areas as *mut Vec<DisplayArea>) as LPARAM,
        );
    }
    areas
}

// winit has no work-area query; other platforms use the whole display.
#[cfg(not(windows))]
fn display_areas() -> Vec<DisplayArea> {
    Vec::new()
}
