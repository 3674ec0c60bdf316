//! Contents of the static files written into generated projects

pub const MAIN_CSS: &str = r#"@import "tailwindcss";
@import "@nuxt/ui";
"#;

pub const APP_VUE: &str = r#"<template>
  <UApp>
    <NuxtLayout>
      <NuxtPage />
    </NuxtLayout>
  </UApp>
</template>
"#;

pub const ESLINT_CONFIG: &str = r#"import withNuxt from './.nuxt/eslint.config.mjs'

export default withNuxt({
  rules: {
    'no-console': 'warn',
  },
})
"#;

pub const VITEST_CONFIG: &str = r#"import { defineVitestConfig } from '@nuxt/test-utils/config'

export default defineVitestConfig({
  test: {
    environment: 'nuxt',
    environmentOptions: {
      nuxt: {
        domEnvironment: 'happy-dom',
      },
    },
  },
})
"#;

pub const EXAMPLE_TEST: &str = r#"import { describe, it, expect } from 'vitest'

describe('Example', () => {
  it('should pass', () => {
    expect(true).toBe(true)
  })
})
"#;

pub const CONTENT_CONFIG: &str = r#"import { defineContentConfig, defineCollection } from '@nuxt/content'

export default defineContentConfig({
  collections: {
    content: defineCollection({
      type: 'page',
      source: '**/*.md',
    }),
  },
})
"#;

pub const CONTENT_INDEX: &str = r#"---
title: Welcome
description: Your first content page
---

# Welcome

This is your first content page.
"#;

pub const ENV_VALIDATE_PLUGIN: &str = r#"import { envSchema } from '~~/shared/utils/env-schema'

export default defineNitroPlugin(() => {
  const result = envSchema.safeParse(process.env)

  if (!result.success) {
    console.error('❌ Invalid environment variables:')
    console.error(result.error.flatten().fieldErrors)
    throw new Error('Invalid environment variables')
  }

  console.log('✅ Environment variables validated')
})
"#;

pub const DRIZZLE_CONFIG: &str = r#"import { defineConfig } from 'drizzle-kit'

export default defineConfig({
  dialect: 'postgresql',
  schema: './server/database/schema/index.ts',
  out: './server/database/migrations',
  dbCredentials: {
    url: process.env.DATABASE_URL!,
  },
  strict: true,
  verbose: true,
  casing: 'snake_case',
})
"#;

pub const DRIZZLE_SCHEMA_INDEX: &str = r#"// Export all your schema definitions here
// import { users } from './users'
// export { users }

export {}
"#;

pub const DRIZZLE_DB: &str = r#"import { drizzle } from 'drizzle-orm/bun-sql'
import * as schema from '../database/schema'

export const db = drizzle(process.env.DATABASE_URL!, {
  schema,
  logger: true,
  casing: 'snake_case',
})
"#;

pub const DRIZZLE_SEED: &str = r#"// import { db } from '../utils/db'
// import * as schema from './schema'

async function seed() {
  console.log('🌱 Seeding database...')

  // Add your seed logic here
  // await db.insert(schema.users).values([...])

  console.log('✅ Seeding complete!')
}

seed().catch(console.error)
"#;

pub const PRISMA_SCHEMA: &str = r#"generator client {
  provider = "prisma-client-js"
}

datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}

// Add your models here
// model User {
//   id        String   @id @default(cuid())
//   email     String   @unique
//   name      String?
//   createdAt DateTime @default(now())
//   updatedAt DateTime @updatedAt
// }
"#;

pub const PRISMA_DB: &str = r#"import { PrismaClient } from '@prisma/client'

const globalForPrisma = globalThis as unknown as {
  prisma: PrismaClient | undefined
}

export const prisma =
  globalForPrisma.prisma ??
  new PrismaClient({
    log: process.env.NODE_ENV === 'development' ? ['query', 'error', 'warn'] : ['error'],
  })

if (process.env.NODE_ENV !== 'production') globalForPrisma.prisma = prisma
"#;

pub const PRISMA_SEED: &str = r#"import { prisma } from '../utils/db'

async function seed() {
  console.log('🌱 Seeding database...')

  // Add your seed logic here
  // await prisma.user.createMany({ data: [...] })

  console.log('✅ Seeding complete!')
}

seed()
  .catch(console.error)
  .finally(() => prisma.$disconnect())
"#;

pub const AUTH_CLIENT: &str = r#"import { createAuthClient } from 'better-auth/vue'

export const authClient = createAuthClient()
"#;

pub const AUTH_ROUTE_HANDLER: &str = r#"import { auth } from '~/server/utils/auth'

export default defineEventHandler((event) => {
  return auth.handler(toWebRequest(event))
})
"#;

pub const AUTH_STORE: &str = r#"import { authClient } from '~/utils/auth-client'

export const useAuthStore = defineStore('useAuthStore', () => {
  const session = ref<Awaited<ReturnType<typeof authClient.useSession>> | null>(null)

  async function init() {
    const data = await authClient.useSession(useFetch)
    session.value = data
  }

  const user = computed(() => session.value?.data?.user)
  const loading = computed(() => session.value?.isPending)

  return {
    init,
    user,
    loading,
  }
})
"#;

pub const AUTH_PLUGIN: &str = r#"export default defineNuxtPlugin(async () => {
  await useAuthStore().init()
})
"#;

pub const AUTH_MIDDLEWARE_STORE: &str = r#"export default defineNuxtRouteMiddleware((to) => {
  const authStore = useAuthStore()

  // Routes with `auth: false` in their meta are public
  if (to.meta.auth === false) {
    return
  }

  if (!authStore.user) {
    return navigateTo({
      path: '/login',
      query: {
        redirectTo: to.path,
      },
    })
  }
})
"#;

pub const AUTH_MIDDLEWARE_CLIENT: &str = r#"import { authClient } from '~/utils/auth-client'

export default defineNuxtRouteMiddleware(async (to) => {
  // Routes with `auth: false` in their meta are public
  if (to.meta.auth === false) {
    return
  }

  const { data } = await authClient.getSession()

  if (!data?.user) {
    return navigateTo({
      path: '/login',
      query: {
        redirectTo: to.path,
      },
    })
  }
})
"#;

pub const H3_TYPES: &str = r#"import type { auth } from '../utils/auth'

export type User = typeof auth.$Infer.Session.user

declare module 'h3' {
  interface H3EventContext {
    user?: User
  }
}
"#;

pub const SESSION_UTIL: &str = r#"import type { H3Event } from 'h3'
import { auth } from './auth'

export const requireAuth = async (event: H3Event) => {
  const session = await auth.api.getSession({ headers: event.headers })

  if (!session?.user) {
    throw createError({ statusCode: 401, statusMessage: 'Unauthorized' })
  }

  event.context.user = session.user
  return session.user
}
"#;

pub const EMAIL_UTIL: &str = r#"import nodemailer from 'nodemailer'
import type { Transporter, SendMailOptions } from 'nodemailer'

const transporter: Transporter = nodemailer.createTransport({
  host: 'smtp.gmail.com',
  port: 587,
  secure: false,
  auth: {
    user: process.env.GMAIL_USER,
    pass: process.env.GMAIL_PASS,
  },
})

export async function sendEmail(options: Omit<SendMailOptions, 'from'>): Promise<void> {
  try {
    const info = await transporter.sendMail({
      from: process.env.GMAIL_USER,
      ...options,
    })
    console.log('Email sent successfully:', info.response)
  } catch (error) {
    console.error('Error sending email:', error)
    throw error
  }
}
"#;

pub const PRETTIER_IGNORE: &str = "node_modules
.nuxt
.output
dist
*.min.js
";

pub const PRE_COMMIT_HOOK: &str = "#!/bin/sh
bun exec lint-staged
";

pub const COMMIT_MSG_HOOK: &str = r#"#!/bin/sh
bunx --no-install commitlint --edit "$1"
"#;

pub const COMMITLINT_CONFIG: &str = "export default {
  extends: ['@commitlint/config-conventional'],
}
";

pub const ERROR_HANDLING: &str = r#"/**
 * Go-style error handling: resolves to an [error, data] tuple
 */
export async function catchError<T>(
  promiseOrValue: Promise<T> | T,
  errorsToCatch?: Array<new (...args: unknown[]) => Error>
): Promise<[Error | undefined, T | undefined]> {
  try {
    const data = await Promise.resolve(promiseOrValue)
    return [undefined, data]
  } catch (err) {
    if (errorsToCatch === undefined || errorsToCatch.some((E) => err instanceof E)) {
      return [err as Error, undefined]
    }
    throw err
  }
}

/**
 * Discriminated success/failure value
 */
export type Result<T, E = Error> = { ok: true; data: T } | { ok: false; error: E }

export function ok<T>(data: T): Result<T, never> {
  return { ok: true, data }
}

export function err<E>(error: E): Result<never, E> {
  return { ok: false, error }
}

/**
 * Run `fn` and capture its outcome as a Result
 */
export async function tryCatch<T, E = Error>(fn: () => Promise<T> | T): Promise<Result<T, E>> {
  try {
    const data = await fn()
    return ok(data)
  } catch (error) {
    return err(error as E)
  }
}
"#;
