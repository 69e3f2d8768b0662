//! Built-in roles, modules, default grants and sidebar tree of the park
//! administration console.
//!
//! These tables are the reviewable security baseline: changing them changes
//! what every fresh deployment grants before any operator override.
use crate::{
    AuthzResult, DefaultMatrix, GrantSet, MatrixSnapshot, MenuNode, ModuleCatalog, ModuleInfo,
    OverrideMatrix, PermissionKind, Role, RoleRegistry,
};
use std::sync::Arc;

pub mod roles {
    pub const SUPER_ADMIN: &str = "super-admin";
    pub const ADMIN_PARQUE: &str = "admin-parque";
    pub const COORDINADOR_ACTIVIDADES: &str = "coordinador-actividades";
    pub const COORDINADOR_VOLUNTARIOS: &str = "coordinador-voluntarios";
    pub const TESORERO: &str = "tesorero";
    pub const CONSULTA: &str = "consulta";
}

pub mod modules {
    pub const DASHBOARD: &str = "Dashboard";
    pub const PARQUES: &str = "Parques";
    pub const ACTIVIDADES: &str = "Actividades";
    pub const CONCESIONES: &str = "Concesiones";
    pub const VOLUNTARIOS: &str = "Voluntarios";
    pub const FINANZAS: &str = "Finanzas";
    pub const REPORTES: &str = "Reportes";
    pub const USUARIOS: &str = "Usuarios";
    pub const CONFIGURACION: &str = "Configuracion";
    pub const SEGURIDAD: &str = crate::SECURITY_MODULE;
}

fn kinds(read: bool, write: bool, admin: bool) -> GrantSet {
    GrantSet::EMPTY
        .with(PermissionKind::Read, read)
        .with(PermissionKind::Write, write)
        .with(PermissionKind::Admin, admin)
}

pub fn role_registry() -> AuthzResult<RoleRegistry> {
    RoleRegistry::new(vec![
        Role::new(roles::SUPER_ADMIN, "Super Administrador", 100).protected(),
        Role::new(roles::ADMIN_PARQUE, "Administrador de Parque", 80),
        Role::new(
            roles::COORDINADOR_ACTIVIDADES,
            "Coordinador de Actividades",
            60,
        ),
        Role::new(
            roles::COORDINADOR_VOLUNTARIOS,
            "Coordinador de Voluntarios",
            60,
        ),
        Role::new(roles::TESORERO, "Tesorero", 60),
        Role::new(roles::CONSULTA, "Consulta", 10),
    ])
}

pub fn module_catalog() -> AuthzResult<ModuleCatalog> {
    ModuleCatalog::new(vec![
        ModuleInfo::new(modules::DASHBOARD, "Panel principal"),
        ModuleInfo::new(modules::PARQUES, "Parques"),
        ModuleInfo::new(modules::ACTIVIDADES, "Actividades"),
        ModuleInfo::new(modules::CONCESIONES, "Concesiones"),
        ModuleInfo::new(modules::VOLUNTARIOS, "Voluntarios"),
        ModuleInfo::new(modules::FINANZAS, "Finanzas"),
        ModuleInfo::new(modules::REPORTES, "Reportes"),
        ModuleInfo::new(modules::USUARIOS, "Usuarios"),
        ModuleInfo::new(modules::CONFIGURACION, "Configuración"),
        ModuleInfo::new(modules::SEGURIDAD, "Seguridad y permisos"),
    ])
}

pub fn default_matrix(
    registry: &RoleRegistry,
    catalog: &ModuleCatalog,
) -> AuthzResult<DefaultMatrix> {
    use modules::*;

    let mut entries: Vec<(&str, &str, GrantSet)> = catalog
        .iter()
        .map(|module| (roles::SUPER_ADMIN, module.id.as_str(), GrantSet::ALL))
        .collect();

    let read = kinds(true, false, false);
    let read_write = kinds(true, true, false);

    entries.extend([
        (roles::ADMIN_PARQUE, DASHBOARD, read),
        (roles::ADMIN_PARQUE, PARQUES, kinds(true, true, true)),
        (roles::ADMIN_PARQUE, ACTIVIDADES, read_write),
        (roles::ADMIN_PARQUE, CONCESIONES, read_write),
        (roles::ADMIN_PARQUE, VOLUNTARIOS, read_write),
        (roles::ADMIN_PARQUE, FINANZAS, read),
        (roles::ADMIN_PARQUE, REPORTES, read_write),
        (roles::ADMIN_PARQUE, USUARIOS, read_write),
        (roles::ADMIN_PARQUE, CONFIGURACION, read_write),
        (roles::ADMIN_PARQUE, SEGURIDAD, read),
        (roles::COORDINADOR_ACTIVIDADES, DASHBOARD, read),
        (roles::COORDINADOR_ACTIVIDADES, PARQUES, read),
        (roles::COORDINADOR_ACTIVIDADES, ACTIVIDADES, read_write),
        (roles::COORDINADOR_ACTIVIDADES, VOLUNTARIOS, read),
        (roles::COORDINADOR_ACTIVIDADES, REPORTES, read),
        (roles::COORDINADOR_VOLUNTARIOS, DASHBOARD, read),
        (roles::COORDINADOR_VOLUNTARIOS, PARQUES, read),
        (roles::COORDINADOR_VOLUNTARIOS, ACTIVIDADES, read),
        (roles::COORDINADOR_VOLUNTARIOS, VOLUNTARIOS, read_write),
        (roles::COORDINADOR_VOLUNTARIOS, REPORTES, read),
        (roles::TESORERO, DASHBOARD, read),
        (roles::TESORERO, CONCESIONES, read),
        (roles::TESORERO, FINANZAS, read_write),
        (roles::TESORERO, REPORTES, read_write),
        (roles::CONSULTA, DASHBOARD, read),
        (roles::CONSULTA, PARQUES, read),
        (roles::CONSULTA, ACTIVIDADES, read),
        (roles::CONSULTA, REPORTES, read),
    ]);

    DefaultMatrix::new(registry, catalog, entries)
}

/// The console sidebar.
pub fn menu_tree() -> Vec<MenuNode> {
    use PermissionKind::{Admin, Read, Write};
    use modules::*;

    vec![
        MenuNode::new("dashboard", "Panel", "/dashboard", DASHBOARD, Read)
            .with_icon("layout-dashboard"),
        MenuNode::new("parques", "Parques", "/parques", PARQUES, Read).with_icon("trees"),
        MenuNode::new(
            "actividades",
            "Actividades",
            "/actividades",
            ACTIVIDADES,
            Read,
        )
        .with_icon("calendar")
        .with_children(vec![
            MenuNode::new(
                "actividades.calendario",
                "Calendario",
                "/actividades/calendario",
                ACTIVIDADES,
                Read,
            ),
            MenuNode::new(
                "actividades.inscripciones",
                "Inscripciones",
                "/actividades/inscripciones",
                ACTIVIDADES,
                Write,
            ),
        ]),
        MenuNode::new(
            "concesiones",
            "Concesiones",
            "/concesiones",
            CONCESIONES,
            Read,
        )
        .with_icon("store"),
        MenuNode::new(
            "voluntarios",
            "Voluntarios",
            "/voluntarios",
            VOLUNTARIOS,
            Read,
        )
        .with_icon("users")
        .with_children(vec![MenuNode::new(
            "voluntarios.turnos",
            "Turnos",
            "/voluntarios/turnos",
            VOLUNTARIOS,
            Write,
        )]),
        MenuNode::new("finanzas", "Finanzas", "/finanzas", FINANZAS, Read)
            .with_icon("wallet")
            .with_children(vec![
                MenuNode::new(
                    "finanzas.ingresos",
                    "Ingresos",
                    "/finanzas/ingresos",
                    FINANZAS,
                    Read,
                ),
                MenuNode::new(
                    "finanzas.egresos",
                    "Egresos",
                    "/finanzas/egresos",
                    FINANZAS,
                    Write,
                ),
            ]),
        MenuNode::new("reportes", "Reportes", "/reportes", REPORTES, Read).with_icon("chart"),
        MenuNode::new(
            "administracion",
            "Administración",
            "/admin",
            CONFIGURACION,
            Admin,
        )
        .with_icon("settings")
        .with_children(vec![
            MenuNode::new(
                "administracion.usuarios",
                "Usuarios",
                "/admin/usuarios",
                USUARIOS,
                Read,
            ),
            MenuNode::new(
                "administracion.configuracion",
                "Configuración",
                "/admin/configuracion",
                CONFIGURACION,
                Read,
            ),
            MenuNode::new(
                "administracion.permisos",
                "Permisos",
                "/admin/permisos",
                SEGURIDAD,
                Admin,
            ),
        ]),
    ]
}

/// Snapshot of the built-in catalogs with an empty override layer.
pub fn default_snapshot() -> AuthzResult<MatrixSnapshot> {
    let registry = role_registry()?;
    let catalog = module_catalog()?;
    let defaults = default_matrix(&registry, &catalog)?;
    Ok(MatrixSnapshot::new(
        Arc::new(registry),
        Arc::new(catalog),
        Arc::new(defaults),
        OverrideMatrix::new(),
    ))
}
