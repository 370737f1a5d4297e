//! The navigation bar shown at the top of every page, plus a bottom bar on small screens.

use maud::{Markup, html};

use crate::endpoints;

/// A group of related pages in the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Overview,
    People,
    Schedule,
    Money,
    Records,
}

impl Section {
    const ALL: [Section; 5] = [
        Section::Overview,
        Section::People,
        Section::Schedule,
        Section::Money,
        Section::Records,
    ];

    fn title(self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::People => "People",
            Section::Schedule => "Schedule",
            Section::Money => "Money",
            Section::Records => "Records",
        }
    }
}

/// Every page in the navigation bar, in display order.
const PAGES: [(Section, &str, &str); 9] = [
    (Section::Overview, endpoints::DASHBOARD_VIEW, "Dashboard"),
    (Section::People, endpoints::STUDENTS_VIEW, "Students"),
    (Section::People, endpoints::STAFF_VIEW, "Staff"),
    (Section::Schedule, endpoints::CLASSES_VIEW, "Classes"),
    (Section::Schedule, endpoints::ATTENDANCE_VIEW, "Attendance"),
    (Section::Schedule, endpoints::EVENTS_VIEW, "Events"),
    (Section::Money, endpoints::FINANCES_VIEW, "Finances"),
    (Section::Money, endpoints::REPORTS_VIEW, "Reports"),
    (Section::Records, endpoints::DOCUMENTS_VIEW, "Documents"),
];

/// Pages with their own button in the mobile bottom bar, the rest go under "More".
const QUICK_LINKS: [&str; 3] = [
    endpoints::DASHBOARD_VIEW,
    endpoints::STUDENTS_VIEW,
    endpoints::ATTENDANCE_VIEW,
];

const LINK_ACTIVE_STYLE: &str = "block rounded-lg px-3 py-2 text-sm font-semibold \
    bg-blue-50 text-blue-700 dark:bg-blue-900/30 dark:text-blue-200";
const LINK_STYLE: &str = "block rounded-lg px-3 py-2 text-sm font-medium \
    text-gray-700 hover:bg-gray-100 hover:text-blue-700 \
    dark:text-gray-200 dark:hover:bg-gray-800 dark:hover:text-blue-200";
const SECTION_TITLE_STYLE: &str = "px-3 pt-2 text-xs font-semibold uppercase \
    tracking-wide text-gray-400 dark:text-gray-500";

#[derive(Debug, Clone)]
struct Link<'a> {
    section: Section,
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            LINK_ACTIVE_STYLE
        } else {
            LINK_STYLE
        };

        html! {
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        }
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// The link for `active_endpoint`, if there is one, is highlighted along
    /// with the section it belongs to.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = PAGES
            .into_iter()
            .map(|(section, url, title)| Link {
                section,
                url,
                title,
                is_current: active_endpoint == url,
            })
            .collect();

        NavBar { links }
    }

    fn links_in(&self, section: Section) -> impl Iterator<Item = &Link<'_>> {
        self.links.iter().filter(move |link| link.section == section)
    }

    fn active_section(&self) -> Option<Section> {
        self.links
            .iter()
            .find(|link| link.is_current)
            .map(|link| link.section)
    }

    fn desktop_html(&self) -> Markup {
        let active_section = self.active_section();

        html! {
            nav class="hidden lg:block bg-white border-b border-gray-200 dark:bg-gray-900 dark:border-gray-700"
            {
                div class="max-w-screen-xl flex items-center justify-between mx-auto px-6 py-3"
                {
                    a href=(endpoints::DASHBOARD_VIEW)
                        class="text-2xl font-semibold whitespace-nowrap text-gray-900 dark:text-white"
                    {
                        "Studio Desk"
                    }

                    ul class="flex items-center gap-2"
                    {
                        @for section in Section::ALL {
                            @let links: Vec<_> = self.links_in(section).cloned().collect();

                            @if let [link] = links.as_slice() {
                                li { (link.clone().into_html()) }
                            } @else {
                                li
                                {
                                    details class="relative"
                                    {
                                        summary
                                            class=(if active_section == Some(section) { LINK_ACTIVE_STYLE } else { LINK_STYLE })
                                            data-section=(section.title())
                                        {
                                            (section.title())
                                        }

                                        div
                                            class="absolute right-0 z-40 mt-2 w-44 rounded-lg border
                                            border-gray-200 bg-white p-2 shadow-lg
                                            dark:border-gray-700 dark:bg-gray-900"
                                        {
                                            @for link in &links {
                                                (link.clone().into_html())
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn mobile_html(&self) -> Markup {
        let more_is_active = self
            .links
            .iter()
            .any(|link| link.is_current && !QUICK_LINKS.contains(&link.url));

        html! {
            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden" aria-label="Primary"
            {
                ul
                    class="mx-4 mb-4 grid grid-cols-4 gap-2 rounded-xl border border-gray-200
                    bg-white/95 p-3 shadow-lg backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                {
                    @for link in self.links.iter().filter(|link| QUICK_LINKS.contains(&link.url)) {
                        li class="min-w-0 text-center" { (link.clone().into_html()) }
                    }

                    li class="min-w-0 text-center"
                    {
                        details class="relative"
                        {
                            summary class=(if more_is_active { LINK_ACTIVE_STYLE } else { LINK_STYLE })
                            {
                                "More"
                            }

                            div
                                class="absolute bottom-full right-0 mb-3 w-48 rounded-xl border
                                border-gray-200 bg-white p-2 text-left shadow-xl
                                dark:border-gray-700 dark:bg-gray-900"
                            {
                                @for section in Section::ALL {
                                    @let links: Vec<_> = self
                                        .links_in(section)
                                        .filter(|link| !QUICK_LINKS.contains(&link.url))
                                        .cloned()
                                        .collect();

                                    @if !links.is_empty() {
                                        p class=(SECTION_TITLE_STYLE) { (section.title()) }

                                        @for link in links {
                                            (link.into_html())
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn into_html(self) -> Markup {
        html! {
            (self.desktop_html())
            (self.mobile_html())
        }
    }
}
