//! The standard Nuxt feature catalog

use super::{ConfigExtra, FeatureDescriptor, FeatureId};
use crate::selection::{
    AuthChoice, EmailService, NuxtModule, OptionalModule, OrmChoice, StorageOption,
};

/// Developer tooling installed into every project
pub const BASELINE_DEV_DEPENDENCIES: &[&str] = &[
    "concurrently",
    "husky",
    "lint-staged",
    "prettier",
    "prettier-plugin-tailwindcss",
    "@commitlint/cli",
    "@commitlint/config-conventional",
];

/// Order in which features contribute to package lists and `nuxt.config.ts`
pub const FEATURE_PRIORITY: &[FeatureId] = &[
    FeatureId::Module(NuxtModule::NuxtUi),
    FeatureId::Module(NuxtModule::Eslint),
    FeatureId::Module(NuxtModule::TestUtils),
    FeatureId::Module(NuxtModule::Pinia),
    FeatureId::Module(NuxtModule::Vueuse),
    FeatureId::Module(NuxtModule::Motion),
    FeatureId::Module(NuxtModule::Seo),
    FeatureId::Module(NuxtModule::Security),
    FeatureId::Module(NuxtModule::Mdc),
    FeatureId::Module(NuxtModule::Icon),
    FeatureId::Module(NuxtModule::Fonts),
    FeatureId::Module(NuxtModule::Scripts),
    FeatureId::Module(NuxtModule::Devtools),
    FeatureId::Module(NuxtModule::Hints),
    FeatureId::Optional(OptionalModule::Content),
    FeatureId::Optional(OptionalModule::Image),
    FeatureId::Storage(StorageOption::Postgres),
    FeatureId::Storage(StorageOption::Mongo),
    FeatureId::Storage(StorageOption::Minio),
    FeatureId::Storage(StorageOption::Redis),
    FeatureId::Storage(StorageOption::Qdrant),
    FeatureId::Orm(OrmChoice::Drizzle),
    FeatureId::Orm(OrmChoice::Prisma),
    FeatureId::Auth(AuthChoice::BetterAuth),
    FeatureId::Email(EmailService::Nodemailer),
];

// Every backend gets runtime env validation (zod) and dotenv for the db scripts
const STORAGE_DEPENDENCIES: &[&str] = &["zod"];
const STORAGE_DEV_DEPENDENCIES: &[&str] = &["dotenv-cli"];

const REDIS_NITRO_STORAGE: &str = "{
  storage: {
    redis: {
      driver: 'redis',
      url: process.env.REDIS_URL || 'redis://localhost:6379',
    },
  },
}";

const fn module(m: NuxtModule, label: &'static str, hint: &'static str) -> FeatureDescriptor {
    FeatureDescriptor::bare(FeatureId::Module(m), label, hint)
}

const fn storage(s: StorageOption, label: &'static str, hint: &'static str) -> FeatureDescriptor {
    FeatureDescriptor {
        dependencies: STORAGE_DEPENDENCIES,
        dev_dependencies: STORAGE_DEV_DEPENDENCIES,
        ..FeatureDescriptor::bare(FeatureId::Storage(s), label, hint)
    }
}

pub const STANDARD_DESCRIPTORS: &[FeatureDescriptor] = &[
    FeatureDescriptor {
        dependencies: &["@nuxt/ui"],
        modules: &["@nuxt/ui"],
        stylesheet: Some("~/assets/css/main.css"),
        ..module(
            NuxtModule::NuxtUi,
            "@nuxt/ui",
            "Intuitive UI Library powered by Tailwind CSS",
        )
    },
    FeatureDescriptor {
        modules: &["@nuxt/eslint"],
        nuxi_module: Some("eslint"),
        ..module(
            NuxtModule::Eslint,
            "@nuxt/eslint",
            "ESLint integration with flat config",
        )
    },
    FeatureDescriptor {
        dev_dependencies: &["@nuxt/test-utils", "vitest", "@vue/test-utils", "happy-dom"],
        modules: &["@nuxt/test-utils/module"],
        ..module(
            NuxtModule::TestUtils,
            "@nuxt/test-utils",
            "Testing utilities with Vitest",
        )
    },
    FeatureDescriptor {
        dependencies: &["pinia-plugin-persistedstate"],
        modules: &["@pinia/nuxt", "pinia-plugin-persistedstate/nuxt"],
        nuxi_module: Some("pinia"),
        ..module(
            NuxtModule::Pinia,
            "@pinia/nuxt",
            "State management + persistedstate",
        )
    },
    FeatureDescriptor {
        modules: &["@vueuse/nuxt"],
        nuxi_module: Some("vueuse"),
        ..module(NuxtModule::Vueuse, "@vueuse/nuxt", "Vue Composition Utilities")
    },
    FeatureDescriptor {
        dependencies: &["@vueuse/motion"],
        modules: &["@vueuse/motion/nuxt"],
        ..module(NuxtModule::Motion, "@vueuse/motion", "Animation directives")
    },
    FeatureDescriptor {
        modules: &["@nuxtjs/seo"],
        nuxi_module: Some("@nuxtjs/seo"),
        ..module(NuxtModule::Seo, "@nuxtjs/seo", "Complete SEO solution")
    },
    FeatureDescriptor {
        modules: &["nuxt-security"],
        nuxi_module: Some("security"),
        extra: Some(ConfigExtra::Security {
            key: "security",
            options: &[("csrf", "true")],
        }),
        ..module(
            NuxtModule::Security,
            "nuxt-security",
            "Security based on OWASP Top 10",
        )
    },
    FeatureDescriptor {
        dependencies: &["@nuxtjs/mdc"],
        modules: &["@nuxtjs/mdc"],
        ..module(NuxtModule::Mdc, "@nuxtjs/mdc", "Markdown components")
    },
    FeatureDescriptor {
        modules: &["@nuxt/icon"],
        nuxi_module: Some("icon"),
        ..module(NuxtModule::Icon, "@nuxt/icon", "Icon component with Iconify")
    },
    FeatureDescriptor {
        modules: &["@nuxt/fonts"],
        nuxi_module: Some("fonts"),
        ..module(NuxtModule::Fonts, "@nuxt/fonts", "Web font optimization")
    },
    FeatureDescriptor {
        modules: &["@nuxt/scripts"],
        nuxi_module: Some("scripts"),
        ..module(
            NuxtModule::Scripts,
            "@nuxt/scripts",
            "Third-party script loading",
        )
    },
    FeatureDescriptor {
        modules: &["@nuxt/devtools"],
        nuxi_module: Some("devtools"),
        ..module(NuxtModule::Devtools, "@nuxt/devtools", "In-app developer tools")
    },
    FeatureDescriptor {
        modules: &["@nuxt/hints"],
        nuxi_module: Some("hints"),
        ..module(
            NuxtModule::Hints,
            "@nuxt/hints",
            "Performance and accessibility hints",
        )
    },
    FeatureDescriptor {
        dependencies: &["@nuxt/content"],
        modules: &["@nuxt/content"],
        ..FeatureDescriptor::bare(
            FeatureId::Optional(OptionalModule::Content),
            "@nuxt/content",
            "File-based CMS with Markdown support",
        )
    },
    FeatureDescriptor {
        modules: &["@nuxt/image"],
        nuxi_module: Some("image"),
        ..FeatureDescriptor::bare(
            FeatureId::Optional(OptionalModule::Image),
            "@nuxt/image",
            "Image optimization with providers",
        )
    },
    storage(StorageOption::Postgres, "PostgreSQL", "Relational database"),
    storage(StorageOption::Mongo, "MongoDB", "Document database"),
    storage(StorageOption::Minio, "MinIO", "S3-compatible object storage"),
    FeatureDescriptor {
        extra: Some(ConfigExtra::SecondaryStorage {
            key: "nitro",
            value: REDIS_NITRO_STORAGE,
        }),
        ..storage(StorageOption::Redis, "Redis", "In-memory cache/store")
    },
    storage(StorageOption::Qdrant, "Qdrant", "Vector database for AI"),
    FeatureDescriptor {
        dependencies: &["drizzle-orm", "drizzle-zod"],
        dev_dependencies: &["drizzle-kit", "drizzle-seed", "postgres"],
        ..FeatureDescriptor::bare(
            FeatureId::Orm(OrmChoice::Drizzle),
            "Drizzle ORM",
            "TypeScript ORM with Bun native support",
        )
    },
    FeatureDescriptor {
        dependencies: &["@prisma/client"],
        dev_dependencies: &["prisma"],
        ..FeatureDescriptor::bare(
            FeatureId::Orm(OrmChoice::Prisma),
            "Prisma",
            "Next-generation Node.js ORM",
        )
    },
    FeatureDescriptor {
        dependencies: &["better-auth"],
        ..FeatureDescriptor::bare(
            FeatureId::Auth(AuthChoice::BetterAuth),
            "Better Auth",
            "Framework-agnostic authentication",
        )
    },
    FeatureDescriptor {
        dependencies: &["nodemailer"],
        dev_dependencies: &["@types/nodemailer"],
        ..FeatureDescriptor::bare(
            FeatureId::Email(EmailService::Nodemailer),
            "Nodemailer",
            "SMTP email delivery for auth flows",
        )
    },
];
