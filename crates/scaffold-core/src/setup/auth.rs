//! Better Auth wiring: server instance, client, route handler and guards

use super::templates;
use super::{Progress, SetupContext};
use crate::report::StageOutcome;
use crate::runtime::CommandRunner;
use crate::selection::{EmailService, NuxtModule, OrmChoice, Selection, StorageOption};

const DRIZZLE_DATABASE: &str = "  database: drizzleAdapter(db, {
    provider: 'pg',
  }),
";

const PRISMA_DATABASE: &str = "  database: prismaAdapter(prisma, {
    provider: 'postgresql',
  }),
";

const REDIS_SESSION: &str = "  secondaryStorage: {
    get: async (key) => {
      const storage = useStorage('redis')
      const value = await storage.getItem(key)
      return value as string | null
    },
    set: async (key, value, ttl) => {
      const storage = useStorage('redis')
      await storage.setItem(key, value, { ttl })
    },
    delete: async (key) => {
      const storage = useStorage('redis')
      await storage.removeItem(key)
    },
  },
  session: {
    cookieCache: {
      enabled: true,
      maxAge: 5 * 60, // 5 minutes
    },
  },
";

const STATELESS_SESSION: &str = "  session: {
    cookieCache: {
      enabled: true,
      maxAge: 7 * 24 * 60 * 60, // 7 days
      strategy: 'jwe',
      refreshCache: true,
    },
  },
  account: {
    storeStateStrategy: 'cookie',
    storeAccountCookie: true,
  },
";

const EMAIL_VERIFICATION: &str = "    // Uncomment to enable email verification
    // requireEmailVerification: true,
    // sendVerificationEmail: async ({ user, url }) => {
    //   await sendEmail({
    //     to: user.email,
    //     subject: 'Verify your email',
    //     html: `<p>Click <a href=\"${url}\">here</a> to verify your email.</p>`,
    //   })
    // },
";

const SOCIAL_PROVIDERS: &str = "  // Uncomment to enable Google OAuth
  // socialProviders: {
  //   google: {
  //     clientId: process.env.GOOGLE_CLIENT_ID as string,
  //     clientSecret: process.env.GOOGLE_CLIENT_SECRET as string,
  //   },
  // },
";

/// `server/utils/auth.ts`
///
/// The adapter follows the ORM. Sessions live in Redis when it is selected; without an
/// ORM and without Redis there is nowhere to persist them, so the session is carried in
/// an encrypted cookie instead.
pub fn auth_server(selection: &Selection) -> String {
    let orm = selection.active_orm();
    let has_redis = selection.has_storage(StorageOption::Redis);
    let has_email = selection.active_email_service() == Some(EmailService::Nodemailer);

    let mut source = String::from("import { betterAuth } from 'better-auth'\n");
    match orm {
        Some(OrmChoice::Drizzle) => {
            source.push_str("import { drizzleAdapter } from 'better-auth/adapters/drizzle'\n");
            source.push_str("import { db } from './db'\n");
        }
        Some(OrmChoice::Prisma) => {
            source.push_str("import { prismaAdapter } from 'better-auth/adapters/prisma'\n");
            source.push_str("import { prisma } from './db'\n");
        }
        _ => {}
    }
    if has_email {
        source.push_str("// import { sendEmail } from './email'\n");
    }

    source.push_str("\nexport const auth = betterAuth({\n");
    match orm {
        Some(OrmChoice::Drizzle) => source.push_str(DRIZZLE_DATABASE),
        Some(OrmChoice::Prisma) => source.push_str(PRISMA_DATABASE),
        _ => {}
    }
    if has_redis {
        source.push_str(REDIS_SESSION);
    } else if orm.is_none() {
        source.push_str(STATELESS_SESSION);
    }

    source.push_str("  emailAndPassword: {\n    enabled: true,\n");
    if has_email {
        source.push_str(EMAIL_VERIFICATION);
    }
    source.push_str("  },\n");
    source.push_str(SOCIAL_PROVIDERS);
    source.push_str("})\n");
    source
}

pub(super) async fn better_auth<R: CommandRunner>(context: &SetupContext<'_, R>) -> StageOutcome {
    let selection = context.selection;
    let server = auth_server(selection);
    let has_pinia = selection.has_module(NuxtModule::Pinia);

    let middleware = if has_pinia {
        templates::AUTH_MIDDLEWARE_STORE
    } else {
        templates::AUTH_MIDDLEWARE_CLIENT
    };

    let mut files = vec![
        ("server/utils/auth.ts", server.as_str()),
        ("app/utils/auth-client.ts", templates::AUTH_CLIENT),
        ("server/api/auth/[...all].ts", templates::AUTH_ROUTE_HANDLER),
        ("app/middleware/auth-middleware.global.ts", middleware),
        ("server/types/h3.ts", templates::H3_TYPES),
        ("server/utils/session.ts", templates::SESSION_UTIL),
    ];
    if has_pinia {
        files.push(("app/stores/auth-store.ts", templates::AUTH_STORE));
        files.push(("app/plugins/auth-plugin.ts", templates::AUTH_PLUGIN));
    }
    if selection.active_email_service() == Some(EmailService::Nodemailer) {
        files.push(("server/utils/email.ts", templates::EMAIL_UTIL));
    }

    let mut progress = Progress::default();
    progress.write_files(context.fs, &files).await;
    progress.outcome()
}
