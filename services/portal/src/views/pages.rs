//! services/portal/src/views/pages.rs
//!
//! Pages without remote data: the public pages, the signed-in landing pages
//! and the error pages.

use alumnos_core::domain::UserProfile;

use crate::views::{Route, SessionContext, ViewResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

fn link(label: &'static str, route: Route) -> NavLink {
    NavLink { label, route }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub links: Vec<NavLink>,
}

fn public_menu() -> Vec<NavLink> {
    vec![
        link("Inicio", Route::Home),
        link("Información", Route::Information),
        link("Iniciar sesión", Route::Login),
        link("Registrate", Route::Registration),
    ]
}

pub fn home() -> Page {
    Page {
        title: "Inicio".into(),
        links: public_menu(),
    }
}

pub fn information() -> Page {
    Page {
        title: "Información".into(),
        links: public_menu(),
    }
}

pub fn not_found(path: &str) -> Page {
    Page {
        title: format!("404: {} not found", path),
        links: vec![link("Inicio", Route::Home)],
    }
}

pub fn server_error() -> Page {
    Page {
        title: "500: server error".into(),
        links: vec![link("Inicio", Route::Home)],
    }
}

/// The landing pages behind the session guard: dashboard and calendar.
#[derive(Clone)]
pub struct SignedInPage {
    session: SessionContext,
    pub user: UserProfile,
    pub title: &'static str,
    pub sidebar: Vec<NavLink>,
    pub header: Vec<NavLink>,
}

impl SignedInPage {
    pub fn dashboard(session: SessionContext) -> ViewResult<Self> {
        Self::mount(
            session,
            "Dashboard",
            vec![
                link("Inicio", Route::Dashboard),
                link("Clases", Route::Classes),
                link("Agregar contacto enviandole un mensaje", Route::Chat),
            ],
        )
    }

    pub fn calendar(session: SessionContext) -> ViewResult<Self> {
        Self::mount(
            session,
            "Calendario",
            vec![
                link("Inicio", Route::Dashboard),
                link("Calendario", Route::Calendar),
                link("Agregar contacto enviandole un mensaje", Route::Chat),
            ],
        )
    }

    fn mount(session: SessionContext, title: &'static str, sidebar: Vec<NavLink>) -> ViewResult<Self> {
        let user = session.require()?.user;
        Ok(Self {
            session,
            user,
            title,
            sidebar,
            header: vec![
                link("Notificaciones", Route::Notifications),
                link("Mensajes", Route::Messages),
            ],
        })
    }

    pub fn logout(&self) -> Route {
        self.session.invalidate();
        Route::Login
    }
}
