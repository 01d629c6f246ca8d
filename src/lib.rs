pub mod app;
pub mod error;
pub mod seeder;
pub mod settings;
pub mod models {
    pub mod category;
    pub mod content;
    pub mod pagination;
    pub mod slides;
}
pub mod carousel {
    pub mod builder;
    pub mod payload;
}
pub mod conversion {
    pub mod generator;
    pub mod prompt;
    pub mod repair;
    pub mod service;
}
pub mod rendering {
    pub mod layout;
    pub mod markdown;
    pub mod renderer;
}
pub mod db {
    pub mod category_repository;
    pub mod content_repository;
}
pub mod storage {
    pub mod client;
}
pub mod api {
    pub mod categories;
    pub mod content;
    pub mod errors;
    pub mod generate;
    pub mod render_pages;
    pub mod renders;
    pub mod response;
    pub mod video_slides;
}

#[cfg(test)]
mod test_support;
