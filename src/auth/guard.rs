//! Route guard
//!
//! Decides whether an authenticated user may reach a route restricted to a
//! set of roles. No persistence; the decision and the denial notice are
//! returned to the caller, which handles navigation and display.

use serde::{Deserialize, Serialize};

/// User role enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Nutritionist,
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Nutritionist => "nutritionist",
            Role::Patient => "patient",
        }
    }

    /// Home route a denied user is sent back to
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Nutritionist => "/dashboard",
            Role::Patient => "/meu-perfil",
        }
    }
}

/// The authenticated user as seen by the guard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub role: Role,
    /// Professional registration, for nutritionist accounts
    pub crn: Option<String>,
    /// Owning nutritionist, for patient accounts
    pub nutricionista_id: Option<String>,
}

/// User-visible denial notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

/// Outcome of a route check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    RedirectToLogin { notice: Notice },
    RedirectToRoleHome { route: &'static str, notice: Notice },
}

/// Check a route restricted to `allowed` roles.
///
/// An empty `allowed` list means any authenticated user may enter. An
/// unauthenticated user is sent to login; an authenticated user with the
/// wrong role is sent to their own role's home route.
pub fn check_route(user: Option<&AuthUser>, allowed: &[Role]) -> GuardDecision {
    let Some(user) = user else {
        return GuardDecision::RedirectToLogin {
            notice: Notice {
                title: "Acesso restrito",
                description: "Você precisa estar logado para acessar esta página.",
            },
        };
    };

    if allowed.is_empty() || allowed.contains(&user.role) {
        return GuardDecision::Allow;
    }

    GuardDecision::RedirectToRoleHome {
        route: user.role.home_route(),
        notice: Notice {
            title: "Acesso negado",
            description: "Você não tem permissão para acessar esta página.",
        },
    }
}
