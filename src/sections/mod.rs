//! Content sections of the company profile.
//!
//! Every section exposes a public read route and a token-gated `/admin`
//! surface mounted under its own base path.

use std::sync::Arc;

use axum::Router;
use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;

use crate::{resource::ResourceService, state::AppState};

pub mod about_company;
pub mod appointment;
pub mod client;
pub mod contact;
pub mod faq;
pub mod hero;
pub mod keynote;
pub mod portfolio_detail;
pub mod portfolio_section;
pub mod service_detail;
pub mod service_section;
pub mod team;
pub mod testimonial;

lazy_static! {
    pub static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").unwrap();
}

pub struct Sections {
    pub hero: hero::HeroService,
    pub clients: client::ClientService,
    pub about: about_company::AboutCompanyService,
    pub keynotes: keynote::KeynoteService,
    pub faqs: faq::FaqService,
    pub teams: team::TeamService,
    pub services: service_section::ServiceSectionService,
    pub service_details: service_detail::ServiceDetailService,
    pub appointments: appointment::AppointmentService,
    pub portfolios: portfolio_section::PortfolioSectionService,
    pub portfolio_details: portfolio_detail::PortfolioDetailService,
    pub testimonials: testimonial::TestimonialService,
    pub contacts: contact::ContactService,
}

impl Sections {
    pub fn postgres(db: &PgPool) -> Self {
        let about = Arc::new(about_company::PgAboutCompanyRepository::new(db.clone()));
        let portfolios = Arc::new(portfolio_section::PgPortfolioSectionRepository::new(db.clone()));

        Self {
            hero: ResourceService::new(Arc::new(hero::PgHeroSectionRepository::new(db.clone()))),
            clients: ResourceService::new(Arc::new(client::PgClientSectionRepository::new(
                db.clone(),
            ))),
            keynotes: ResourceService::with_parent(
                Arc::new(keynote::PgKeynoteRepository::new(db.clone())),
                about.clone(),
            ),
            about: ResourceService::new(about),
            faqs: ResourceService::new(Arc::new(faq::PgFaqSectionRepository::new(db.clone()))),
            teams: ResourceService::new(Arc::new(team::PgOurTeamRepository::new(db.clone()))),
            services: ResourceService::new(Arc::new(
                service_section::PgServiceSectionRepository::new(db.clone()),
            )),
            service_details: ResourceService::new(Arc::new(
                service_detail::PgServiceDetailRepository::new(db.clone()),
            )),
            appointments: ResourceService::new(Arc::new(
                appointment::PgAppointmentRepository::new(db.clone()),
            )),
            portfolio_details: ResourceService::with_parent(
                Arc::new(portfolio_detail::PgPortfolioDetailRepository::new(db.clone())),
                portfolios.clone(),
            ),
            testimonials: ResourceService::with_parent(
                Arc::new(testimonial::PgTestimonialRepository::new(db.clone())),
                portfolios.clone(),
            ),
            portfolios: ResourceService::new(portfolios),
            contacts: ResourceService::new(Arc::new(contact::PgContactUsRepository::new(
                db.clone(),
            ))),
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        let about = Arc::new(about_company::memory_repository());
        let portfolios = Arc::new(portfolio_section::memory_repository());

        Self {
            hero: ResourceService::new(Arc::new(hero::memory_repository())),
            clients: ResourceService::new(Arc::new(client::memory_repository())),
            keynotes: ResourceService::with_parent(
                Arc::new(keynote::memory_repository()),
                about.clone(),
            ),
            about: ResourceService::new(about),
            faqs: ResourceService::new(Arc::new(faq::memory_repository())),
            teams: ResourceService::new(Arc::new(team::memory_repository())),
            services: ResourceService::new(Arc::new(service_section::memory_repository())),
            service_details: ResourceService::new(Arc::new(service_detail::memory_repository())),
            appointments: ResourceService::new(Arc::new(
                appointment::fake::MemoryAppointments::new(),
            )),
            portfolio_details: ResourceService::with_parent(
                Arc::new(portfolio_detail::memory_repository()),
                portfolios.clone(),
            ),
            testimonials: ResourceService::with_parent(
                Arc::new(testimonial::memory_repository()),
                portfolios.clone(),
            ),
            portfolios: ResourceService::new(portfolios),
            contacts: ResourceService::new(Arc::new(contact::memory_repository())),
        }
    }
}

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/hero-sections", hero::routes(state))
        .nest("/client-sections", client::routes(state))
        .nest("/about-company", about_company::routes(state))
        .nest("/about-company-keynotes", keynote::routes(state))
        .nest("/faq-sections", faq::routes(state))
        .nest("/our-teams", team::routes(state))
        .nest("/service-sections", service_section::routes(state))
        .nest("/service-details", service_detail::routes(state))
        .nest("/appointments", appointment::routes(state))
        .nest("/portfolio-sections", portfolio_section::routes(state))
        .nest("/portfolio-details", portfolio_detail::routes(state))
        .nest("/portfolio-testimonials", testimonial::routes(state))
        .nest("/contact-us", contact::routes(state))
}
